//! Configuration section definitions.
//!
//! Each module corresponds to a section in `fontmirror.toml`:
//!
//! | Module    | TOML Section | Purpose                               |
//! |-----------|--------------|---------------------------------------|
//! | `fonts`   | `[fonts]`    | Families, destination, URL base       |
//! | `http`    | `[http]`     | User agent and request timeout        |
//! | `statics` | `[static]`   | Host static dirs and URL (fallbacks)  |

mod fonts;
mod http;
mod statics;

pub use fonts::FontsConfig;
pub use http::HttpConfig;
pub use statics::StaticConfig;
