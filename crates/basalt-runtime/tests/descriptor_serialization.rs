use basalt_runtime::{ReleaseInfo, RuntimeDescriptor};

#[test]
fn descriptor_roundtrip() {
    let descriptor = RuntimeDescriptor {
        name: "temurin-17".into(),
        release: Some(ReleaseInfo {
            version: "17.0.1".into(),
            arch: "aarch64".into(),
            major_version: 17,
        }),
        is_bundled: false,
        is_legacy_layout: false,
    };
    let json = serde_json::to_string(&descriptor).expect("serialize");
    let back: RuntimeDescriptor = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, descriptor);
}

#[test]
fn placeholder_descriptor_roundtrip() {
    let descriptor = RuntimeDescriptor {
        name: "damaged".into(),
        release: None,
        is_bundled: false,
        is_legacy_layout: false,
    };
    let json = serde_json::to_string(&descriptor).expect("serialize");
    let back: RuntimeDescriptor = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.release, None);
    assert_eq!(back.major_version(), 0);
}
