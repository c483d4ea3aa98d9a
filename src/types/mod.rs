// ABOUTME: Validated domain types shared by the console client and deployer.
// ABOUTME: Bundle names are checked once at the edge so commands can embed them verbatim.

mod bundle_id;
mod bundle_name;

pub use bundle_id::{BundleId, BundleIdError};
pub use bundle_name::{BundleName, BundleNameError};
