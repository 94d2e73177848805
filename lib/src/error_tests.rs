use std::thread;

use super::*;

#[test]
fn converts_panic_payloads_into_thread_errors() {
    let handle = thread::spawn(|| panic!("listener blew up"));
    let err: ScanError = handle.join().unwrap_err().into();
    assert!(matches!(
        err,
        ScanError::Thread(ref msg) if msg.contains("listener blew up")
    ));
}

#[test]
fn converts_builder_errors_into_serialization_errors() {
    let err: ScanError =
        ArpPacketBuilderError::UninitializedField("dest_ip").into();
    assert!(matches!(
        err,
        ScanError::Serialization(ref msg) if msg.contains("dest_ip")
    ));
}

#[test]
fn formats_capture_open_errors_with_interface_name() {
    let err = ScanError::CaptureOpen {
        interface: "eth7".to_string(),
        error: "permission denied".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "failed to open capture session on eth7: permission denied"
    );
}
