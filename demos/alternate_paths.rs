//! Alternate Paths Example
//!
//! This example writes the sample records through the spreadsheet object model
//! and reads them back with the `select * from [sheet$]` driver query.

use xlsxloader::{sample_people, DriverReader, RecordWriter, TableQuery, WorkbookWriter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Get output file path from command line arguments or use default
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "alternate_paths.xlsx".to_string());
    let path = std::path::Path::new(&path);

    // Write with typed cells (numeric age) and display labels as the header
    WorkbookWriter.write_records(path, "people", &sample_people())?;
    println!("Wrote {}", path.display());

    // The sheet is addressed as the table `people$`
    let query = TableQuery::select_all("people");
    println!("Query: {}", query);

    let rows = DriverReader.query(path, &query)?;
    println!("Columns: {}", rows.columns().join(", "));
    for row in rows.rows() {
        println!("{}", row.join(" - "));
    }

    Ok(())
}
