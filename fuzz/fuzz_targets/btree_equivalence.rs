#![no_main]

use cordyceps_avl::model::{run_btree_equivalence, BtreeEquivalenceInput};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: BtreeEquivalenceInput| {
    run_btree_equivalence(input.mode, input.ops);
});
