#![no_main]

use ferrous_ioc::{Container, ContainerDocument, TypeCatalog};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let catalog = TypeCatalog::new();
    for document in [ContainerDocument::from_json_str(text), ContainerDocument::from_yaml_str(text)] {
        if let Ok(document) = document {
            let container = Container::new();
            // An empty catalog rejects every entry; only panics are failures here
            let result = container.apply_document(&document, &catalog);
            assert!(document.services.is_empty() || result.is_err());
        }
    }
});
