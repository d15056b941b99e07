use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::wire::table::TableSpec;

/// Localizable text: a locale to text map resolved at render time.
///
/// Text-bundle mechanics live with the UI; this type only carries the
/// translations across the wire and picks the best match.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Translatable {
    translations: BTreeMap<String, String>,
}

impl Translatable {
    pub fn new(locale: impl Into<String>, text: impl Into<String>) -> Self {
        let mut translations = BTreeMap::new();
        translations.insert(locale.into(), text.into());
        Self { translations }
    }

    pub fn with(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.translations.insert(locale.into(), text.into());
        self
    }

    /// Resolve for a locale, falling back to `en`, then to any translation.
    pub fn resolve(&self, locale: &str) -> &str {
        self.translations
            .get(locale)
            .or_else(|| self.translations.get("en"))
            .or_else(|| self.translations.values().next())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Page the sandbox asks the UI to display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Page {
    Splash,
    Donation(DonationPage),
    End,
}

/// One step of the donation dialogue for a single platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DonationPage {
    pub platform: String,
    pub header: PageHeader,
    pub body: PromptBody,
    pub footer: PageFooter,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageHeader {
    pub title: Translatable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageFooter {
    /// Progress through the flow, in percent.
    pub progress: f64,
}

/// Interactive body of a donation page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PromptBody {
    FileInput(FileInputPrompt),
    Confirm(ConfirmPrompt),
    ConsentForm(ConsentFormPrompt),
}

/// Ask the user to pick a file from their device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileInputPrompt {
    pub description: Translatable,
    /// Accepted file types, as a comma-separated MIME list.
    pub extensions: String,
}

/// Ask the user a yes/no question; resolves `true` or `false`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfirmPrompt {
    pub text: Translatable,
    pub ok: Translatable,
    pub cancel: Translatable,
}

/// Review-and-consent step: editable tables plus read-only meta tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsentFormPrompt {
    pub description: Translatable,
    pub donate_question: Translatable,
    pub donate_button: Translatable,
    pub cancel_button: Translatable,
    pub tables: Vec<TableSpec>,
    pub meta_tables: Vec<TableSpec>,
}
