use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Account types
    types.push(clean_type(User::export_to_string()?));
    types.push(clean_type(RegisterUserRequest::export_to_string()?));
    types.push(clean_type(LoginRequest::export_to_string()?));
    types.push(clean_type(LoginResponse::export_to_string()?));

    // Catalog types
    types.push(clean_type(CatalogItem::export_to_string()?));
    types.push(clean_type(CreateCatalogItemRequest::export_to_string()?));
    types.push(clean_type(UpdateCatalogItemRequest::export_to_string()?));
    types.push(clean_type(CatalogItemsResponse::export_to_string()?));

    // Timesheet types
    types.push(clean_type(TimesheetStatus::export_to_string()?));
    types.push(clean_type(Timesheet::export_to_string()?));
    types.push(clean_type(OpenTimesheetRequest::export_to_string()?));
    types.push(clean_type(TimesheetsResponse::export_to_string()?));

    // Time entry types
    types.push(clean_type(TimeEntry::export_to_string()?));
    types.push(clean_type(CreateTimeEntryRequest::export_to_string()?));
    types.push(clean_type(UpdateTimeEntryRequest::export_to_string()?));
    types.push(clean_type(TimeEntriesResponse::export_to_string()?));

    // Report types
    types.push(clean_type(ProjectTimeReportQuery::export_to_string()?));
    types.push(clean_type(ProjectTimeReport::export_to_string()?));
    types.push(clean_type(TimesheetReport::export_to_string()?));
    types.push(clean_type(ProjectSummary::export_to_string()?));
    types.push(clean_type(TimeEntryDetail::export_to_string()?));
    types.push(clean_type(DailyTotal::export_to_string()?));

    // Error types
    types.push(clean_type(ValidationErrors::export_to_string()?));
    types.push(clean_type(ErrorResponse::export_to_string()?));

    let output_dir = Path::new("../web/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    // Keep imports only when the definition refers to another exported type
    let lines: Vec<&str> = type_def.lines().collect();
    let has_import = lines
        .iter()
        .any(|line| line.trim().starts_with("import type"));

    let filtered: Vec<&str> = lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.starts_with("import type") {
                return has_import;
            }
            // Filter out the generated comment line
            !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .cloned()
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
