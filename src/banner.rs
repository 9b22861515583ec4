//! Startup banner display.

use crate::consts::{AUTHOR, HOMEPAGE, REPO};

/// Session configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub server: &'a str,
    pub backend: &'a str,
    pub accumulation: &'a str,
}

/// Print the startup banner with session info.
pub fn print_banner(info: &BannerInfo) {
    println!(
        r#"
   ╔═══════════════════════════════════════╗
   ║               A  I  Q                 ║
   ║    ask three AIs, read one answer     ║
   ╚═══════════════════════════════════════╝

   version       {}
   by            {}
   home          {}
   repo          {}
   server        {}
   backend       {}
   accumulation  {}
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        HOMEPAGE,
        REPO,
        info.server,
        info.backend,
        info.accumulation,
    );
}
