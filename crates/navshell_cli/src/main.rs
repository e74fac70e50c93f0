//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `navshell_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use navshell_core::{
    GroupDimension, ModeCatalog, NavService, OrderOverrides, SqliteSessionRepository, UnitRegistry,
};

fn main() {
    println!("navshell_core ping={}", navshell_core::ping());
    println!("navshell_core version={}", navshell_core::core_version());

    // Ephemeral store: the smoke probe exercises the full wiring without
    // touching any on-disk session.
    let conn = match navshell_core::db::open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("navshell_core store error: {err}");
            std::process::exit(1);
        }
    };
    let registry = match UnitRegistry::load_baseline() {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("navshell_core registry error: {err}");
            std::process::exit(1);
        }
    };

    let service = NavService::new(
        registry,
        ModeCatalog::baseline(),
        OrderOverrides::new(),
        SqliteSessionRepository::new(&conn),
    );

    println!("navshell_core mode={}", service.current_mode());
    println!("navshell_core mode_label={}", service.current_mode_label());
    println!(
        "navshell_core wp4_order={}",
        service
            .effective_order(GroupDimension::WorkPackage, Some(&"wp4".to_string()))
            .join(",")
    );
}
