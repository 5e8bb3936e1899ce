use anyhow::Result;

use npm_runner_core::CommandFamily;

use crate::display::format_catalog;
use crate::host::Host;

pub fn list_command(roots: &[String], family: Option<&str>, json: bool) -> Result<()> {
    let family = match family {
        Some(family) => CommandFamily::from_args(&[family])?,
        None => CommandFamily::all_scripts(),
    };

    let mut host = Host::new(roots, None)?;
    let catalog = host.session.catalog(&family);

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    if catalog.is_empty() {
        println!("❌ {}", family.not_found());
        return Ok(());
    }

    println!("📦 {} ({} entries)", family, catalog.len());
    print!("{}", format_catalog(&catalog, host.session.is_multi_root()));
    Ok(())
}
