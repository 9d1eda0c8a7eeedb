use curio_core::Envelope;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            println!("{payload}");
        }
        OutputFormat::Text => render_text(envelope),
    }

    Ok(())
}

fn render_text(envelope: &Envelope<Value>) {
    if let Some(cards) = envelope.data.get("cards").and_then(Value::as_array) {
        let total = envelope.data.get("total").and_then(Value::as_u64).unwrap_or(0);
        let page = envelope.data.get("page").and_then(Value::as_u64).unwrap_or(1);
        let total_pages = envelope
            .data
            .get("total_pages")
            .and_then(Value::as_u64)
            .unwrap_or(0);

        println!("{total} match(es), page {page}/{total_pages}");
        for card in cards {
            println!("  {}", card_line(card));
        }
    } else if let Some(artwork) = envelope.data.get("artwork") {
        render_artwork(artwork);
    } else if let Some(sources) = envelope.data.get("sources").and_then(Value::as_array) {
        for source in sources {
            println!(
                "{}  [{}]  {}",
                field(source, "id"),
                source
                    .get("operations")
                    .and_then(Value::as_array)
                    .map(|ops| {
                        ops.iter()
                            .filter_map(Value::as_str)
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_default(),
                field(source, "status"),
            );
        }
    }

    for warning in &envelope.meta.warnings {
        println!("note: {warning}");
    }
    for error in &envelope.errors {
        println!("error: {} ({})", error.message, error.code);
    }
}

fn render_artwork(artwork: &Value) {
    println!("{} — {}", field(artwork, "title"), field(artwork, "artist"));
    println!("  {}", field(artwork, "date_line"));
    println!("  {}", field(artwork, "medium"));

    let credit = field(artwork, "credit_line");
    if !credit.is_empty() {
        println!("  {credit}");
    }
    if let Some(image) = artwork.get("image").filter(|image| !image.is_null()) {
        println!("  image: {}", field(image, "image_id"));
    }
}

fn card_line(card: &Value) -> String {
    format!(
        "[{}] {} — {} ({})",
        card.get("id").and_then(Value::as_u64).unwrap_or(0),
        field(card, "title"),
        field(card, "artist"),
        field(card, "date_line"),
    )
}

fn field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}
