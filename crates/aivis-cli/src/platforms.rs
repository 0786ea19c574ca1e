//! Platform capability listing.

use aivis_core::PlatformIdentity;

pub(crate) fn print_capability_table() {
    println!(
        "{:<12} {:<14} {}",
        "platform", "requires_auth", "web_search"
    );
    for platform in PlatformIdentity::ALL {
        println!(
            "{:<12} {:<14} {}",
            platform.as_str(),
            platform.requires_auth(),
            platform.supports_web_search()
        );
    }
}
