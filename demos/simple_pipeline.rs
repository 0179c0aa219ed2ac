// Simple pipeline example
// Author: Gabriel Demetrios Lafis

use tabular_prep::{
    data::{DataSet, Value},
    processing::{FillMethod, RowPolicy},
    session::{Operation, Session},
};

const REVIEWS: &str = "\
id,age,plan,review
1,34,pro,Fast shipping and great support!
2,,basic,The app crashes every time I open it.
3,51,pro,
4,27,basic,Great value for the price.
5,45,,Support never answered my emails.
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::default();
    session.load_csv(REVIEWS.as_bytes())?;

    println!("Original dataset:");
    print_dataset(session.dataset()?);

    let operations = vec![
        Operation::FillMissing {
            column: "age".to_string(),
            method: FillMethod::Median,
        },
        Operation::DropRows {
            policy: RowPolicy::Subset(vec!["plan".to_string()]),
            confirmed: true,
        },
        Operation::OneHotEncode {
            column: "plan".to_string(),
        },
        Operation::CleanText {
            column: "review".to_string(),
        },
        Operation::LengthFeatures {
            column: "review".to_string(),
        },
        Operation::Tfidf {
            column: "review".to_string(),
            max_features: Some(3),
        },
    ];

    for operation in operations {
        let outcome = session.apply(operation)?;
        println!(
            "-> {} rows x {} columns ({} rows removed)",
            outcome.rows, outcome.columns, outcome.rows_removed
        );
    }

    println!("\nProcessed dataset:");
    print_dataset(session.dataset()?);

    println!("\n{}", session.report());

    Ok(())
}

// Helper function to print a dataset
fn print_dataset(dataset: &DataSet) {
    println!("{}", dataset.column_names().join(" | "));

    for row in &dataset.data {
        let cells: Vec<String> = row
            .values
            .iter()
            .map(|value| match value {
                Value::Null => "NULL".to_string(),
                Value::Float(f) => format!("{:.3}", f),
                other => other.to_string(),
            })
            .collect();
        println!("{}", cells.join(" | "));
    }
}
