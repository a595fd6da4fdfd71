mod cli;
mod paths;
mod run;

use std::process;

use assets::AssetError;

fn main() {
    let args = cli::parse();
    if let Err(err) = run::run(args) {
        // Missing assets carry a category-specific exit status; everything
        // else is a generic failure.
        if let Some(asset) = err.downcast_ref::<AssetError>() {
            eprintln!("Error: {asset}");
            process::exit(asset.exit_code());
        }
        eprintln!("Error: {err:?}");
        process::exit(1);
    }
}
