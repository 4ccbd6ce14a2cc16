use bevy::prelude::*;

use crate::tools::info_panel::catalog::{AccessoryRecord, Catalog};

/// Display-ready text for the info panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRecord {
    pub id: String,
    pub title: String,
    pub manufacturer: String,
    pub model_number: String,
    pub price_label: String,
    pub description: String,
    /// One `• feature` line per feature.
    pub features_text: String,
    pub image: Option<String>,
}

impl From<&AccessoryRecord> for DisplayRecord {
    fn from(record: &AccessoryRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.name.clone(),
            manufacturer: record.manufacturer.clone(),
            model_number: record.model_number.clone(),
            price_label: format!("${:.2}", record.price),
            description: record.description.clone(),
            features_text: record
                .features
                .iter()
                .map(|f| format!("• {f}\n"))
                .collect(),
            image: record.image.clone(),
        }
    }
}

/// Where the panel content ends up.
pub trait DisplaySink {
    fn push(&mut self, record: &DisplayRecord);

    fn clear(&mut self) {}
}

/// Sink that keeps every pushed record.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub pushed: Vec<DisplayRecord>,
    pub cleared: usize,
}

impl DisplaySink for RecordingSink {
    fn push(&mut self, record: &DisplayRecord) {
        self.pushed.push(record.clone());
    }

    fn clear(&mut self) {
        self.cleared += 1;
    }
}

#[derive(Resource, Debug, Default)]
pub struct InfoPanelDispatcher {
    current: Option<DisplayRecord>,
}

impl InfoPanelDispatcher {
    /// Look `id` up, falling back to a stub, and push it to `sink`.
    pub fn show(
        &mut self,
        id: &str,
        catalog: &dyn Catalog,
        sink: &mut dyn DisplaySink,
    ) -> Option<&DisplayRecord> {
        if id.is_empty() {
            warn!("Info panel asked to show an empty accessory id");
            return None;
        }
        let record = catalog.get(id).unwrap_or_else(|| {
            debug!("Accessory {id:?} not in catalog, showing stub");
            AccessoryRecord::stub(id)
        });
        let shown = DisplayRecord::from(&record);
        sink.push(&shown);
        info!("Info panel showing {:?}", shown.title);
        self.current = Some(shown);
        self.current.as_ref()
    }

    pub fn close(&mut self, sink: &mut dyn DisplaySink) {
        if self.current.take().is_some() {
            sink.clear();
        }
    }

    pub fn current(&self) -> Option<&DisplayRecord> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn features_become_bullet_lines() {
        let mut record = AccessoryRecord::stub("exhaust");
        record.features = vec!["Quad tips".into(), "Titanium".into()];
        record.price = 899.0;
        let display = DisplayRecord::from(&record);
        assert_eq!(display.features_text, "• Quad tips\n• Titanium\n");
        assert_eq!(display.price_label, "$899.00");
    }

    #[test]
    fn close_clears_sink_once() {
        let catalog = crate::tools::info_panel::catalog::AccessoryCatalog::default();
        let mut sink = RecordingSink::default();
        let mut dispatcher = InfoPanelDispatcher::default();
        dispatcher.show("gear_stick", &catalog, &mut sink);
        dispatcher.close(&mut sink);
        dispatcher.close(&mut sink);
        assert_eq!(sink.cleared, 1);
        assert!(dispatcher.current().is_none());
    }
}
