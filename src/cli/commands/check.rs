//! Tool availability check.

use console::style;

use pdflang::config::Config;
use pdflang::languages;
use pdflang::ocr::tools;

/// Report which external tools and tesseract language packs are installed.
pub async fn cmd_check(config: &Config, codes: Vec<String>) -> anyhow::Result<()> {
    println!("\n{}", style("Tool Status").bold());
    println!("{}", "-".repeat(50));

    let mut all_ok = true;
    for (tool, available) in tools::check_tools() {
        let status = if available {
            style("✓ found".to_string()).green()
        } else {
            all_ok = false;
            style(format!("✗ not found (install {})", tools::package_for(&tool))).red()
        };
        println!("  {:<12} {}", tool, status);
    }

    let wanted = if codes.is_empty() {
        config.languages.clone()
    } else {
        codes
    };

    if !wanted.is_empty() {
        println!("\n{}", style("Languages:").cyan());
        let installed = match tools::tesseract_languages() {
            Ok(installed) => installed,
            Err(e) => {
                println!("  {} {}", style("!").yellow(), style(e).dim());
                Vec::new()
            }
        };

        for code in &wanted {
            let code = code.trim().to_lowercase();
            let name = languages::display_name(&code);
            let has_pack = installed.iter().any(|lang| *lang == code);
            let status = match (&name, has_pack) {
                (None, _) => style("✗ unknown language code".to_string()).red(),
                (Some(_), true) => style("✓ tesseract pack installed".to_string()).green(),
                (Some(_), false) => {
                    style(format!("✗ no tesseract pack (install tesseract-ocr-{})", code)).red()
                }
            };
            if name.is_none() || !has_pack {
                all_ok = false;
            }
            println!(
                "  {:<4} {:<12} {}",
                code.to_uppercase(),
                name.unwrap_or_default(),
                status
            );
        }
    }

    println!();
    if all_ok {
        println!("{} Everything needed for detection is available", style("✓").green());
    } else {
        println!(
            "{} Some requirements are missing; see above",
            style("!").yellow()
        );
    }

    Ok(())
}
