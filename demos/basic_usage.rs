use scalamed_errors::{
    AppError, ConnectionType, RenderOptions, Result, UserErrorCategory, catalog, template_values,
};

fn load_patient(id: &str) -> Result<()> {
    // Simulate a backing store outage behind a missing record
    if id == "P-404" {
        let cause = AppError::connection(ConnectionType::Database, "patients-replica")
            .with_details("read timed out after 5s")
            .with_debug_info("dsn=postgres://patients-replica:5432/records");

        return Err(AppError::service(
            &catalog::RECORD_DOES_NOT_EXIST,
            template_values! { "context" => "Patient" },
        )
        .with_details(cause));
    }
    Ok(())
}

fn main() {
    println!("--- Basic Usage Example ---\n");

    match load_patient("P-404") {
        Ok(_) => println!("Success!"),
        Err(err) => {
            // What the API client gets: status, code and reference to quote.
            println!("1. [RESPONSE]");
            println!("   status:    {}", err.http_status());
            println!("   code:      {:?}", err.code());
            println!("   reference: {}", err.reference());
            println!("   message:   {}", err.headline());

            // Default rendering: headline plus details, never debug info.
            println!("\n2. [DISPLAY]");
            println!("   {}", err);

            // Trusted local rendering with debug info.
            println!("\n3. [DEBUG RENDER]");
            println!("   {}", err.render(&RenderOptions::default().with_debug_info()));

            // Structured log line, as shipped to the log pipeline.
            println!("\n4. [LOG LINE]");
            err.with_log(&RenderOptions::default(), |log| {
                println!("   {}", log);
                log.emit();
            });
        }
    }

    let user = AppError::user(UserErrorCategory::InvalidInput, "Date of birth is in the future");
    println!("\n5. [USER ERROR] {} -> {}", user.http_status(), user);
}
