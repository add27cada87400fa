//! A signup form validated end to end: declarations, transforms, optional
//! fields, a country-dependent branch, and the final report.
//!
//! Run with: cargo run --example signup_form -p gauntlet

use gauntlet::prelude::*;
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Gauntlet - Signup Form ===\n");

    // the payload as it came off the wire
    let username = "  Ada_99  ";
    let email = "ada@example.com";
    let age = "17";
    let website = "";
    let country = "US";
    let zip = "9021";

    let mut chain = Chain::new();

    // 1. Username: trimmed, then shape-checked
    chain
        .declare("username", username)?
        .run_transform("trim", &[])?
        .run("is_length", &[json!({ "min": 3, "max": 20 })])?
        .with_message("must be 3-20 characters")
        .run("matches", &[json!("^[A-Za-z][A-Za-z0-9_]*$")])?
        .with_message("letters, digits and underscores only");

    // 2. Email: cheap structural checks
    chain
        .declare("email", email)?
        .run("contains", &[json!("@")])?
        .run("is_ascii", &[])?;

    // 3. Age: converted to a number, then range-checked
    chain
        .declare("age", age)?
        .run_transform("to_int", &[])?
        .run("is_int", &[json!({ "min": 18, "max": 120 })])?
        .with_message_fn(|v| json!(format!("{v} is not an adult age")));

    // 4. Website is optional: an absent value skips its checks
    chain.declare("website", website)?.optional().run("is_url", &[])?;

    // 5. ZIP rules depend on the declared country
    chain.declare("country", country)?.run("is_alpha", &[])?;
    chain
        .declare("zip", zip)?
        .branch_if_values(|_, values| values["country"] == json!("US"))
        .run("matches", &[json!(r"^\d{5}$")])?
        .with_message("US zip codes are five digits")
        .end_branch();

    // 6. The report
    println!("error count: {}\n", chain.error_count());
    println!("errors:");
    println!("{}\n", serde_json::to_string_pretty(&chain.errors())?);
    println!("values:");
    println!("{}\n", serde_json::to_string_pretty(&chain.values())?);

    // 7. Bail stops everything downstream after a hard failure
    let mut strict = Chain::new();
    strict
        .declare("token", "")?
        .run("is_length", &[json!({ "min": 1 })])?
        .with_message("token is required")
        .bail()
        .declare("payload", "{}")?
        .run("is_json", &[])?;
    println!(
        "strict chain: {} error(s), payload reached: {}",
        strict.error_count(),
        strict.results().contains_label("payload")
    );

    Ok(())
}
