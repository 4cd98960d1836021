//! Utility to cache the account owner's person info from the command line
//!
//! Usage: set_person_info <imperial|metric> <height> <weight> [first_name] [last_name]
//!
//! Height is form text: `5' 6''` or `5.6` in imperial, centimeters in metric.

use havwtr::config;
use havwtr::db::{migrations, Database};
use havwtr::tools::person_info::{save_person_info, PersonInfoInput};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        eprintln!("Usage: set_person_info <imperial|metric> <height> <weight> [first_name] [last_name]");
        std::process::exit(2);
    }

    let db_path = config::database_path();
    println!("Database path: {}", db_path.display());
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&db_path)?;
    database.with_conn(|conn| migrations::run_migrations(conn))?;

    let input = PersonInfoInput {
        measurement: args[0].clone(),
        height: Some(args[1].clone()),
        weight: args[2].parse().ok(),
        first_name: args.get(3).cloned(),
        last_name: args.get(4).cloned(),
        ..Default::default()
    };

    let detail = save_person_info(&database, None, input)?;
    println!("Person info saved:");
    println!("  Measurement: {}", detail.info.measurement.title());
    if let Some(text) = &detail.form.height_text {
        println!("  {}: {}", detail.form.height_label, text);
    }
    if let Some(text) = &detail.form.weight_text {
        println!("  {}: {}", detail.form.weight_label, text);
    }
    println!("  Updated: {}", detail.info.updated_at);

    Ok(())
}
