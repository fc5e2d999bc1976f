// Exclude entire file from coverage - binary entry point cannot be unit tested
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

fn main() {
    if let Err(e) = text_expander_lib::run() {
        eprintln!("text-expander: {}", e);
        std::process::exit(1);
    }
}
