//! CSV rendering of the donation ledger for finance reconciliation.

use super::domain::Donation;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode donation export: {0}")]
    Encode(#[from] csv::Error),
    #[error("failed to flush donation export: {0}")]
    Io(#[from] std::io::Error),
    #[error("donation export was not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

fn format_amount(cents: u32) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Render donations in listing order as `text/csv`. Anonymous gifts leave
/// the donor column empty rather than inventing a placeholder.
pub fn donations_csv(donations: &[Donation]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "donation_id",
        "campaign",
        "amount",
        "donated_on",
        "method",
        "donor",
        "status",
        "receipt_reference",
    ])?;

    for donation in donations {
        writer.write_record([
            donation.id.0.as_str(),
            donation.campaign.as_str(),
            format_amount(donation.amount_cents).as_str(),
            donation.donated_on.to_string().as_str(),
            donation.method.label(),
            donation.donor.as_deref().unwrap_or_default(),
            donation.status.label(),
            donation.receipt_reference.as_deref().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    let bytes = writer.into_inner().map_err(|_| {
        std::io::Error::new(std::io::ErrorKind::Other, "csv writer buffer unavailable")
    })?;
    Ok(String::from_utf8(bytes)?)
}
