use std::sync::Arc;
use std::thread;

use lampd::Engine;
use lampd::EngineConfig;
use lampd::Reading;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn test_same_device_readings_serialize() {
    init_tracing();
    let engine = Arc::new(Engine::new(EngineConfig::default()).unwrap());

    // Four threads hammer the same device with dark samples. Every update
    // holds the device lock for the full four stages, so the running sums
    // stay exact no matter how the threads interleave.
    let mut handles = Vec::new();
    for _ in 0..4 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            for _ in 0..250 {
                engine
                    .process(&Reading::new("lamp-1", 1, 1, 4.5))
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    // 1000 dark samples deep, the 10-slot window must hold exactly ten 1s
    // and the 60-slot motion window exactly sixty 1s.
    let result = engine.process(&Reading::new("lamp-1", 1, 1, 4.5)).unwrap();
    assert_eq!(result.smoothed_light, 10.0);
    assert!(result.is_night);
    assert_eq!(result.traffic_intensity_pct, 100.0);
    assert_eq!(engine.device_count(), 1);
}

#[test]
fn test_distinct_devices_process_in_parallel() {
    init_tracing();
    let engine = Arc::new(Engine::new(EngineConfig::default()).unwrap());

    let mut handles = Vec::new();
    for i in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            let id = format!("lamp-{i}");
            for _ in 0..100 {
                engine.process(&Reading::new(&id, 1, 0, 0.3)).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(engine.device_count(), 8);
    for i in 0..8 {
        let result = engine
            .process(&Reading::new(format!("lamp-{i}"), 1, 0, 0.3))
            .unwrap();
        assert_eq!(result.smoothed_light, 10.0);
    }
}

#[test]
fn test_record_json_shape() {
    init_tracing();
    let engine = Engine::new(EngineConfig::default()).unwrap();

    let mut result = None;
    for _ in 0..10 {
        result = Some(engine.process(&Reading::new("lamp-1", 1, 1, 4.5)).unwrap());
    }

    let json = serde_json::to_string_pretty(&result.unwrap()).unwrap();
    insta::assert_snapshot!(json, @r#"
    {
      "smoothed_light": 10.0,
      "is_night": true,
      "traffic_intensity_pct": 16.7,
      "brightness_pct": 100,
      "mode": "ACTIVE",
      "anomaly": 0
    }
    "#);
}
