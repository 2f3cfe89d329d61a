//! Browser tests for the JS-facing API
#![cfg(target_arch = "wasm32")]

use otb_wasm::convert::{bmp_file_name_js, otb_to_bmp_blob, otb_to_bmp_js};
use otb_wasm::led::LedController;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn converts_to_blob_bytes() {
    let array = otb_to_bmp_blob(&[0x00, 0x08, 0x01, 0x01, 0xff]).unwrap();
    assert_eq!(array.length(), 66);
    assert_eq!(array.to_vec(), otb_to_bmp_js(&[0x00, 0x08, 0x01, 0x01, 0xff]).unwrap());
}

#[wasm_bindgen_test]
fn rejects_bad_input() {
    assert!(otb_to_bmp_js(&[0x00]).is_err());
    assert_eq!(bmp_file_name_js("nokia.otb"), "nokia.bmp");
}

#[wasm_bindgen_test]
fn controller_queues_commands() {
    let mut controller = LedController::new();
    controller.begin_connect().unwrap();
    controller.finish_connect().unwrap();
    controller.fill_all("#ffffff").unwrap();
    let lines = controller.drain_commands();
    assert_eq!(lines[0], "led_count:8\r\n");
    assert_eq!(lines.len(), 3);
    assert!(controller.drain_commands().is_empty());
    controller.random_colors().unwrap();
    assert_eq!(controller.colors().len(), 24);
}
