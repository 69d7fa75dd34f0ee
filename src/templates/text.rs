// templates/text.rs
//
// Plain-text alternative to the HTML report, for clients that don't render HTML.

use crate::domain::{Report, ReportEntry};
use crate::templates::components::{format_float_grouped, format_int};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{self, Write};

const RULE: &str = "==================================================";
const THIN_RULE: &str = "--------------------------------------------------";

pub fn report_text(report: &Report, generated_at: DateTime<Utc>) -> String {
    TextReport {
        report,
        generated_at,
    }
    .to_string()
}

struct TextReport<'a> {
    report: &'a Report,
    generated_at: DateTime<Utc>,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_report(out, self.report, self.generated_at)
    }
}

fn write_report(out: &mut impl Write, report: &Report, generated_at: DateTime<Utc>) -> fmt::Result {
    writeln!(out, "SUMMIT COUNTY REAL ESTATE REPORT")?;
    writeln!(out, "Property modifications {}", report.window)?;
    writeln!(out, "{RULE}\n")?;

    let entries = &report.entries;
    let with_structures = entries.iter().filter(|e| living_sqft(e) > 0.0).count();
    let total_acres: f64 = entries.iter().map(acres).sum();
    let total_living: f64 = entries.iter().map(living_sqft).sum();

    writeln!(out, "EXECUTIVE SUMMARY")?;
    writeln!(out, "{THIN_RULE}")?;
    let total = format_int(entries.len() as i64);
    let structures = format_int(with_structures as i64);
    let total_acres = format_float_grouped(total_acres, 2);
    let total_living = format_float_grouped(total_living, 0);
    writeln!(out, "Total Properties:           {total}")?;
    writeln!(out, "Properties with Structures: {structures}")?;
    writeln!(out, "Total Acreage:              {total_acres} acres")?;
    writeln!(out, "Total Living Space:         {total_living} sq ft")?;
    writeln!(out)?;

    writeln!(out, "PROPERTIES BY LOCATION")?;
    writeln!(out, "{THIN_RULE}")?;
    for (town, count) in town_counts(entries) {
        writeln!(out, "{town:<30} {count:>3} properties")?;
    }

    writeln!(out, "\n\nPROPERTY DETAILS\n{RULE}\n")?;
    for (i, entry) in entries.iter().enumerate() {
        write_entry(out, i + 1, entry)?;
    }

    writeln!(out, "\nREPORT INFORMATION")?;
    writeln!(out, "{THIN_RULE}")?;
    writeln!(out, "Generated:    {} UTC", generated_at.format("%Y-%m-%d %H:%M"))?;
    writeln!(out, "Data Source:  Summit County GIS")?;
    writeln!(out, "Website:      https://gis.summitcountyco.gov")?;
    writeln!(out)?;
    writeln!(
        out,
        "This report contains property information from Summit County, Colorado."
    )?;
    Ok(())
}

fn write_entry(out: &mut impl Write, number: usize, entry: &ReportEntry) -> fmt::Result {
    let living = living_sqft(entry);
    let acres = acres(entry);
    let kind = if living > 0.0 {
        "Residential Property"
    } else if acres > 0.0 {
        "Vacant Land"
    } else {
        "Commercial/Other"
    };

    writeln!(
        out,
        "PROPERTY #{number} - Schedule #{}",
        entry.schedule.as_deref().unwrap_or("N/A")
    )?;
    writeln!(out, "Type: {kind} | Location: {}", town(entry))?;
    writeln!(out, "Address: {}", primary_address(entry))?;
    writeln!(out, "Details: {}", entry.url.as_deref().unwrap_or("N/A"))?;
    writeln!(out, "{THIN_RULE}")?;

    if acres > 0.0 {
        writeln!(out, "Land Size:      {acres:.2} acres")?;
    }
    if living > 0.0 {
        writeln!(out, "Living Space:   {} sq ft", format_float_grouped(living, 0))?;
    }

    let bedrooms = number_attr(entry, "NumBedRms");
    if bedrooms > 0.0 {
        writeln!(out, "Bedrooms:       {bedrooms}")?;
    }
    let bathrooms = number_attr(entry, "TotBath");
    if bathrooms > 0.0 {
        writeln!(out, "Bathrooms:      {bathrooms:.1}")?;
    }
    let cars = number_attr(entry, "NumOfCars");
    if cars > 0.0 {
        match text_attr(entry, "GarageType") {
            Some(kind) => writeln!(out, "Parking:        {cars} cars ({kind})")?,
            None => writeln!(out, "Parking:        {cars} cars")?,
        }
    }

    writeln!(
        out,
        "PPI:            {}",
        entry.ppi().unwrap_or_else(|| "N/A".to_string())
    )?;

    // Date only; the time of day is noise in a summary.
    let modified = entry.modified.to_string();
    let modified = match entry.modified.sort_key() {
        Some(_) => modified.split_whitespace().next().unwrap_or_default().to_string(),
        None => modified,
    };
    writeln!(out, "Last Updated:   {modified}")?;
    writeln!(
        out,
        "Description:    {}",
        text_attr(entry, "ShortDesc").unwrap_or("No description available")
    )?;
    writeln!(out, "\n{RULE}\n")?;
    Ok(())
}

fn living_sqft(entry: &ReportEntry) -> f64 {
    entry.living_sqft.unwrap_or(0.0)
}

fn acres(entry: &ReportEntry) -> f64 {
    entry.acres.unwrap_or(0.0)
}

fn number_attr(entry: &ReportEntry, field: &str) -> f64 {
    entry.attr(field).and_then(Value::as_f64).unwrap_or(0.0)
}

fn text_attr<'a>(entry: &'a ReportEntry, field: &str) -> Option<&'a str> {
    entry
        .attr(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn town(entry: &ReportEntry) -> &str {
    text_attr(entry, "TownName").unwrap_or("Unknown")
}

/// `FullAdd` packs address lines with `|`; the first one is the street address.
fn primary_address(entry: &ReportEntry) -> &str {
    entry
        .address
        .as_deref()
        .filter(|a| *a != "N/A")
        .and_then(|a| a.split('|').next())
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or("Address Not Available")
}

fn town_counts(entries: &[ReportEntry]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        *counts.entry(town(entry)).or_insert(0) += 1;
    }
    counts
}
