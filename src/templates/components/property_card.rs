// templates/components/property_card.rs

use crate::domain::ReportEntry;
use crate::templates::components::value_cell;
use maud::{html, Markup};

struct Row {
    label: &'static str,
    field: &'static str,
    no_commas: bool,
}

const fn row(label: &'static str, field: &'static str) -> Row {
    Row {
        label,
        field,
        no_commas: false,
    }
}

const fn id_row(label: &'static str, field: &'static str) -> Row {
    Row {
        label,
        field,
        no_commas: true,
    }
}

const SECTIONS: &[(&str, &[Row])] = &[
    (
        "📊 Basic Information",
        &[
            row("PPI", "PPI"),
            id_row("Schedule", "Schedule"),
            row("Filing", "Filing"),
            row("Phase", "Phase"),
            row("Description", "ShortDesc"),
            row("Last Modified", "MODDATE"),
        ],
    ),
    (
        "📍 Address Information",
        &[
            id_row("House Number", "HouseNum"),
            row("Full Street", "FullStreet"),
            row("Street Name", "StreetName"),
            row("Town", "TownName"),
            id_row("Postal Code", "PostCode"),
            row("Full Address", "FullAdd"),
        ],
    ),
    (
        "📐 Property Size",
        &[
            row("Total Acres", "TotAcres"),
            row("Total Square Feet", "SquareFeet"),
            row("Living Square Feet", "SqeFtLiving"),
        ],
    ),
    (
        "🏠 Building Details",
        &[
            row("Basement Type", "BsmtType"),
            row("Garage Type", "GarageType"),
            row("Number of Cars", "NumOfCars"),
            row("Garage Sq Ft", "GarSqFt"),
        ],
    ),
    (
        "🛏️ Room Information",
        &[
            row("Number of Rooms", "NumOfRms"),
            row("Bedrooms", "NumBedRms"),
            row("Lofts", "NumLofts"),
            row("Kitchens", "NumKitch"),
            row("Master Bathrooms", "MasterBath"),
            row("Full Bathrooms", "FullBath"),
            row("Total Bathrooms", "TotBath"),
        ],
    ),
];

/// One property in the HTML report. `number` is 1-based.
pub fn property_card(number: usize, entry: &ReportEntry) -> Markup {
    html! {
        div class="property-card" {
            div class="property-header" {
                h3 { "Property #" (number) }
                div class="address" { (value_cell(entry.attr("FullAdd"), false)) }
                div class="schedule" { "Schedule: " (value_cell(entry.attr("Schedule"), true)) }
            }
            div class="property-details" {
                div class="details-grid" {
                    @for (title, rows) in SECTIONS {
                        div class="detail-section" {
                            h4 { (title) }
                            @for row in rows.iter() {
                                div class="detail-row" {
                                    span class="detail-label" { (row.label) ":" }
                                    span class="detail-value" { (value_cell(entry.attr(row.field), row.no_commas)) }
                                }
                            }
                        }
                    }
                }
                a href=(entry.url.as_deref().unwrap_or("#")) class="view-link" target="_blank" {
                    "View Full Details on County Website →"
                }
            }
        }
    }
}
