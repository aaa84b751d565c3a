use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("litemon version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
