//! Fuzz target for UnifiedPath parsing and manipulation

#![no_main]

use libfuzzer_sys::fuzz_target;
use unipath_core::UnifiedPath;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let path = UnifiedPath::new(input);

        // Scheme classification must be stable under reparse.
        assert_eq!(UnifiedPath::new(path.as_str()).scheme(), path.scheme());

        // Exercise various operations
        let _ = path.fs_path();
        let _ = path.uri_prefix();
        let _ = path.name();
        let _ = path.extension();
        let _ = path.authority();

        // Derived paths keep the scheme tag.
        if let Some(parent) = path.parent() {
            assert_eq!(parent.scheme(), path.scheme());
        }
        if input.is_char_boundary(10.min(input.len())) {
            let prefix = &input[..10.min(input.len())];
            assert_eq!(path.join(prefix).scheme(), path.scheme());
        }
    }
});
