//! # RocketShoes CLI Entry Point
//!
//! ```text
//! $ rocketshoes add 1            # add one unit of product 1
//! $ rocketshoes update 1 3       # set product 1 to 3 units
//! $ rocketshoes remove 1
//! $ rocketshoes show
//! $ rocketshoes config --save
//! ```
//!
//! Exit status is 1 when the command was rejected (a notice was shown) or
//! failed.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    rocketshoes_cli::run().await
}
