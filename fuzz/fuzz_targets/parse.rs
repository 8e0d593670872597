#![no_main]
use jsonquery::{Mode, Navigator};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(tree) = jsonquery::parse_slice(data) {
        let document = tree.document();
        let flat = document.to_value();
        assert_eq!(document.to_full_path_value(), flat);
        let _ = jsonquery::nodes_to_value(document.descendants(), Mode::FullPath);
        for node in document.descendants() {
            assert_eq!(node.cursor().value(), node.inner_text());
        }
        let _ = document.output_xml().to_string();
    }
});
