use colored::*;
use moodmap::MoodmapError;
use moodmap::models::{InferenceOutcome, PlaceStatus, RecommendedPlace, StoreCard, Tag, TagKind};
use moodmap::providers::ProviderError;
use moodmap::seed::SeedReport;
use serde::Serialize;
use serde_json::json;

pub struct CliColors;

impl CliColors {
    pub fn success() -> Color {
        Color::TrueColor {
            r: 34,
            g: 197,
            b: 94,
        }
    }

    pub fn error() -> Color {
        Color::TrueColor {
            r: 239,
            g: 68,
            b: 68,
        }
    }

    pub fn warning() -> Color {
        Color::TrueColor {
            r: 245,
            g: 158,
            b: 11,
        }
    }

    pub fn info() -> Color {
        Color::TrueColor {
            r: 59,
            g: 130,
            b: 246,
        }
    }

    pub fn emotion() -> Color {
        Color::TrueColor {
            r: 168,
            g: 85,
            b: 247,
        }
    }

    pub fn muted() -> Color {
        Color::TrueColor {
            r: 148,
            g: 163,
            b: 184,
        }
    }

    pub fn accent() -> Color {
        Color::TrueColor {
            r: 59,
            g: 130,
            b: 246,
        }
    }
}

pub fn is_json(output_format: &str) -> bool {
    output_format == "json"
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    );
}

/// Output a MoodmapError, as structured JSON when requested
pub fn output_error_json(error: &MoodmapError, output_format: &str) {
    if is_json(output_format) {
        let (code, details) = match error {
            MoodmapError::Storage(_) => ("STORAGE_ERROR", None),
            MoodmapError::Configuration(_) => ("CONFIGURATION_ERROR", None),
            MoodmapError::Logging(_) => ("LOGGING_ERROR", None),
            MoodmapError::Blob(_) => ("UPLOAD_ERROR", None),
            MoodmapError::Provider(ProviderError::NotConfigured(provider)) => (
                "PROVIDER_NOT_CONFIGURED",
                Some(json!({
                    "provider": provider,
                    "hint": "Set MOODMAP_PLACES__API_KEY or MOODMAP_LLM__API_KEY, or add the key to the config file"
                })),
            ),
            MoodmapError::Provider(_) => ("PROVIDER_ERROR", None),
            MoodmapError::Validation(_) => ("VALIDATION_ERROR", None),
            MoodmapError::NotFound(_) => ("NOT_FOUND", None),
            MoodmapError::Forbidden(_) => ("FORBIDDEN", None),
            MoodmapError::Conflict(_) => ("CONFLICT", None),
            MoodmapError::NoPlacesFound => ("NO_PLACES_FOUND", None),
            MoodmapError::Seed(_) => ("SEED_ERROR", None),
            MoodmapError::Other(_) => ("OTHER_ERROR", None),
        };

        let mut error_response = json!({
            "error": true,
            "code": code,
            "message": error.to_string(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        if let Some(details) = details {
            error_response["details"] = details;
        }

        eprintln!(
            "{}",
            serde_json::to_string_pretty(&error_response).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        eprintln!("{}", format_error(&error.to_string()));
    }
}

pub fn format_success(msg: &str) -> String {
    format!(
        "{} {}",
        "✓".color(CliColors::success()).bold(),
        msg.color(CliColors::success())
    )
}

pub fn format_error(msg: &str) -> String {
    format!(
        "{} {}",
        "✗".color(CliColors::error()).bold(),
        msg.color(CliColors::error())
    )
}

pub fn format_warning(msg: &str) -> String {
    format!(
        "{} {}",
        "⚠".color(CliColors::warning()).bold(),
        msg.color(CliColors::warning())
    )
}

pub fn format_info(msg: &str) -> String {
    format!(
        "{} {}",
        "ℹ".color(CliColors::info()).bold(),
        msg.color(CliColors::info())
    )
}

pub fn format_status(status: PlaceStatus) -> ColoredString {
    match status {
        PlaceStatus::Operating => status.label().color(CliColors::success()),
        PlaceStatus::Closed => status.label().color(CliColors::error()).bold(),
        PlaceStatus::Moved => status.label().color(CliColors::warning()),
    }
}

fn format_emotions<S: AsRef<str>>(names: &[S]) -> ColoredString {
    names
        .iter()
        .map(|n| format!("#{}", n.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
        .color(CliColors::emotion())
}

fn format_rating(rating: Option<f64>) -> String {
    rating
        .map(|r| format!("★ {:.1}", r))
        .unwrap_or_else(|| "-".to_string())
}

pub fn print_seed_report(report: &SeedReport) {
    println!(
        "{}",
        format_success(&format!(
            "Seeded tags: {} created, {} already present, {} skipped",
            report.created, report.existing, report.skipped
        ))
    );
}

pub fn print_diagnostics(report: &serde_json::Value) {
    let storage = &report["storage"];
    if storage["healthy"].as_bool().unwrap_or(false) {
        println!("{}", format_success("Storage: healthy"));
    } else {
        println!("{}", format_error("Storage: unhealthy"));
    }

    for (name, label) in [("places", "Places provider"), ("llm", "LLM provider")] {
        if report["providers"][name].as_bool().unwrap_or(false) {
            println!("{}", format_success(&format!("{}: configured", label)));
        } else {
            println!("{}", format_warning(&format!("{}: not configured", label)));
        }
    }

    let metadata = &storage["metadata"];
    println!(
        "{} {}/{}",
        "Database:".color(CliColors::muted()),
        metadata["namespace"].as_str().unwrap_or("?"),
        metadata["database"].as_str().unwrap_or("?")
    );
    if let Some(records) = metadata["records"].as_object() {
        for (table, count) in records {
            println!("  {:<24} {}", table, count);
        }
    }
}

pub fn print_tag_list(kind: TagKind, tags: &[Tag]) {
    let title = match kind {
        TagKind::Emotion => "Emotions",
        TagKind::Location => "Locations",
    };
    println!("{}", format!("━━━ {} ━━━", title).color(CliColors::accent()).bold());

    if tags.is_empty() {
        println!("{}", format_info("None. Run `moodmap-cli seed` first."));
        return;
    }

    println!(
        "{:<8} {}",
        "ID".color(CliColors::muted()).bold(),
        "Name".color(CliColors::muted()).bold()
    );
    println!("{}", "─".repeat(32).color(CliColors::muted()));
    for tag in tags {
        println!("{:<8} {}", tag.id.color(CliColors::accent()), tag.name);
    }
}

pub fn print_recommended_places(places: &[RecommendedPlace]) {
    if places.is_empty() {
        println!("{}", format_info("No places found."));
        return;
    }

    println!(
        "{}",
        format_info(&format!("Found {} places:", places.len()))
    );
    println!();

    for (i, rec) in places.iter().enumerate() {
        let place = &rec.place;
        println!(
            "{} {} {} {}",
            format!("{}.", i + 1).color(CliColors::muted()),
            place.name.bold(),
            format_rating(place.google_rating).color(CliColors::warning()),
            format_status(place.status)
        );
        println!("   {}", place.address.color(CliColors::muted()));
        if let Some(summary) = &rec.summary {
            println!("   {}", summary.summary);
        }
        let emotions: Vec<&str> = rec.emotions.iter().map(|e| e.name.as_str()).collect();
        if !emotions.is_empty() {
            println!("   {}", format_emotions(&emotions));
        }
    }
}

pub fn print_inference(outcome: &InferenceOutcome) {
    println!(
        "{}",
        "━━━ Recommendation Session ━━━".color(CliColors::accent()).bold()
    );
    println!(
        "{}: {}",
        "Session".color(CliColors::muted()),
        outcome.session.id.color(CliColors::accent())
    );
    if !outcome.session.overall_recommendation.is_empty() {
        println!();
        println!("{}", outcome.session.overall_recommendation);
    }
    println!();
    print_recommended_places(&outcome.places);
}

pub fn print_store_card(card: &StoreCard) {
    println!("{}", format!("━━━ {} ━━━", card.name).color(CliColors::accent()).bold());
    println!(
        "{}: {}",
        "Address".color(CliColors::muted()),
        card.address
    );
    println!(
        "{}: {}",
        "Status".color(CliColors::muted()),
        format_status(card.status)
    );
    println!(
        "{}: {}",
        "Rating".color(CliColors::muted()),
        format_rating(card.rating)
    );
    if let Some(photo) = &card.photo_url {
        println!("{}: {}", "Photo".color(CliColors::muted()), photo);
    }
    if !card.summary_card.is_empty() {
        println!("{}: {}", "Summary".color(CliColors::muted()), card.summary_card);
    }
    if !card.emotion_tags.is_empty() {
        println!(
            "{}: {}",
            "Emotions".color(CliColors::muted()),
            format_emotions(&card.emotion_tags)
        );
    }
}
