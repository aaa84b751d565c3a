use crate::core::driver::UrlOpener;

/// Opens URLs with the desktop's default handler
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultBrowser;

impl UrlOpener for DefaultBrowser {
    fn open_url(&self, url: &str) -> std::io::Result<()> {
        open::that(url)
    }
}
