// templates/pages/report.rs

use crate::domain::Report;
use crate::templates::{components::property_card, email_layout};
use chrono::{DateTime, Utc};
use maud::{html, Markup};

pub const REPORT_TITLE: &str = "Summit County Property Data Report";

/// The HTML body of the report email.
pub fn report_page(report: &Report, generated_at: DateTime<Utc>) -> Markup {
    email_layout(
        REPORT_TITLE,
        html! {
            div class="header" {
                h1 { (REPORT_TITLE) }
                p { "Property modifications from " (report.window.start.format("%B %d, %Y").to_string()) }
                p { "Generated on " (generated_at.format("%B %d, %Y at %I:%M %p UTC").to_string()) }
            }

            @for (i, entry) in report.entries.iter().enumerate() {
                (property_card(i + 1, entry))
            }
        },
    )
}
