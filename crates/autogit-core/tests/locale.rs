//! Sync under a translated git. Kept in its own test binary because it
//! changes the process environment.

mod common;

use autogit_core::SyncOutcome;
use pretty_assertions::assert_eq;

use common::*;

#[test]
fn sync_succeeds_with_german_messages() {
    // SAFETY: this is the only test in this binary, so nothing reads the
    // environment concurrently.
    unsafe {
        std::env::set_var("LANGUAGE", "de");
        std::env::set_var("LANG", "de_DE.UTF-8");
        std::env::set_var("LC_ALL", "de_DE.UTF-8");
    }

    let f = Fixture::new();
    let (first, _) = f.sync(&[""]);
    assert_eq!(first.unwrap(), SyncOutcome::Success);

    std::fs::write(f.work().join("post.md"), "# Hallo\n").unwrap();
    let (second, console) = f.sync(&[""]);
    assert_eq!(second.unwrap(), SyncOutcome::Success);
    assert!(console.shows("No changes to commit."));
    assert_eq!(subjects(f.work()), vec![CAPTURE, "Initial commit"]);
    assert_eq!(f.remote_tip(), head(f.work()));
}
