#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

use axmat_memory::{Arena, ArenaOptions, NoOpReporter, MAX_ALIGN};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // First byte picks the block size, the rest are request sizes
    let block_size = usize::from(data[0]) * 8;
    let options = ArenaOptions::with_block_size(block_size);
    let Ok(arena) = Arena::with_options(options, Arc::new(NoOpReporter)) else {
        return;
    };

    let mut regions: Vec<&mut [u8]> = Vec::new();
    for (tag, pair) in data[1..].chunks(2).enumerate() {
        let len = pair.iter().fold(0usize, |acc, &b| acc * 256 + usize::from(b)) % 4096;
        let fill = u8::try_from(tag % 256).unwrap_or(0);
        let region = arena.alloc_slice_fill_copy(len, fill).unwrap();
        if !region.is_empty() {
            assert_eq!(region.as_ptr() as usize % MAX_ALIGN, 0);
        }
        regions.push(region);
    }

    // Earlier regions must be untouched by later allocations
    for (tag, region) in regions.iter().enumerate() {
        let fill = u8::try_from(tag % 256).unwrap_or(0);
        assert!(region.iter().all(|&b| b == fill));
    }
    assert!(arena.used() <= arena.capacity());
});
