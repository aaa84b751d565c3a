use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use litemon::core::sensors::{
    sensor_update_task, HardwareProvider, Readings, SafeReloader, SensorCategory,
    SensorDescriptor, SensorHub, SensorKind,
};
use litemon::Result;
use tokio::sync::{broadcast, watch};

struct SwitchableProvider {
    open: bool,
    with_cpu: Arc<AtomicBool>,
    cpu_present: bool,
}

impl HardwareProvider for SwitchableProvider {
    fn open(&mut self) -> Result<()> {
        self.cpu_present = self.with_cpu.load(Ordering::SeqCst);
        self.open = true;
        Ok(())
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn refresh(&mut self) {}

    fn sensors(&self) -> Vec<SensorDescriptor> {
        if !self.open {
            return Vec::new();
        }
        let mut sensors = vec![SensorDescriptor {
            id: "mem/load".to_string(),
            category: SensorCategory::Memory,
            kind: SensorKind::Load,
            name: "Memory".to_string(),
        }];
        if self.cpu_present {
            sensors.push(SensorDescriptor {
                id: "cpu/load".to_string(),
                category: SensorCategory::Cpu,
                kind: SensorKind::Load,
                name: "CPU Total".to_string(),
            });
        }
        sensors
    }

    fn read(&self, sensor_id: &str) -> Option<f32> {
        if !self.open {
            return None;
        }
        match sensor_id {
            "mem/load" => Some(42.0),
            "cpu/load" if self.cpu_present => Some(13.5),
            _ => None,
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_update_loop_picks_up_reloaded_sensors() {
    let with_cpu = Arc::new(AtomicBool::new(false));
    let hub = Arc::new(
        SensorHub::open(Box::new(SwitchableProvider {
            open: false,
            with_cpu: Arc::clone(&with_cpu),
            cpu_present: false,
        }))
        .unwrap(),
    );

    let (readings_tx, mut readings_rx) = watch::channel(Arc::new(Readings::default()));
    let (shutdown_tx, _) = broadcast::channel(1);
    let task = tokio::spawn(sensor_update_task(
        Arc::clone(&hub),
        Duration::from_millis(100),
        readings_tx,
        shutdown_tx.subscribe(),
    ));

    readings_rx.changed().await.unwrap();
    {
        let readings = readings_rx.borrow_and_update();
        assert_eq!(readings.values.get("MEM.Load"), Some(&42.0));
        assert!(!readings.values.contains_key("CPU.Load"));
    }

    with_cpu.store(true, Ordering::SeqCst);
    assert!(SafeReloader::new(Arc::clone(&hub)).reload().is_reloaded());

    readings_rx.changed().await.unwrap();
    {
        let readings = readings_rx.borrow_and_update();
        assert_eq!(readings.values.get("CPU.Load"), Some(&13.5));
        assert_eq!(readings.values.get("MEM.Load"), Some(&42.0));
    }

    shutdown_tx.send(()).unwrap();
    task.await.unwrap();
}

#[test]
fn test_concurrent_reload_and_sampling() {
    let with_cpu = Arc::new(AtomicBool::new(true));
    let hub = Arc::new(
        SensorHub::open(Box::new(SwitchableProvider {
            open: false,
            with_cpu,
            cpu_present: false,
        }))
        .unwrap(),
    );

    let sampler = {
        let hub = Arc::clone(&hub);
        std::thread::spawn(move || {
            for _ in 0..200 {
                let readings = hub.sample();
                assert!(readings
                    .values
                    .keys()
                    .all(|key| key == "MEM.Load" || key == "CPU.Load"));
            }
        })
    };

    let reloader = SafeReloader::new(Arc::clone(&hub));
    for _ in 0..50 {
        assert!(reloader.reload().is_reloaded());
    }

    sampler.join().unwrap();
    assert_eq!(hub.sensor_map().len(), 2);
}
