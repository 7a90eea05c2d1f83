//! Plugin lifecycle as driven by the datastore: initialization, one call per
//! change notification, and cleanup.

use tracing::{error, info, warn};
use yang_tree_core::Datastore;

use crate::config::PluginConfig;
use crate::delivery::{ConfigSink, DeliveryError};
use crate::translator::ConfigTranslator;

/// Result of one translate-and-deliver pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A document of `bytes` bytes reached the sink.
    Delivered { bytes: usize },
    /// The model root had no data; nothing was sent.
    Skipped,
}

/// Translates the datastore on demand and hands the result to a sink.
pub struct Plugin<K> {
    translator: ConfigTranslator,
    sink: K,
}

impl<K: ConfigSink> Plugin<K> {
    pub fn new(translator: ConfigTranslator, sink: K) -> Self {
        Self { translator, sink }
    }

    pub fn from_config(config: &PluginConfig, sink: K) -> Self {
        Self::new(ConfigTranslator::new(config.model_root.clone()), sink)
    }

    pub fn translator(&self) -> &ConfigTranslator {
        &self.translator
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Push the current configuration once at startup.
    pub fn init<S: Datastore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<ApplyOutcome, DeliveryError> {
        let outcome = self.apply(store);
        match &outcome {
            Ok(_) => info!(root = self.translator.model_root(), "plugin initialized"),
            Err(err) => error!(error = %err, "plugin initialization failed"),
        }
        outcome
    }

    /// Handle one change notification.
    pub fn on_change<S: Datastore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<ApplyOutcome, DeliveryError> {
        info!(root = self.translator.model_root(), "configuration has changed");
        self.apply(store)
    }

    /// Translate the current state and deliver it. An empty document is
    /// never delivered.
    pub fn apply<S: Datastore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<ApplyOutcome, DeliveryError> {
        let document = self.translator.get_config(store);
        if document.is_empty() {
            warn!(
                root = self.translator.model_root(),
                "no configuration to deliver"
            );
            return Ok(ApplyOutcome::Skipped);
        }

        self.sink.deliver(&document)?;
        info!(bytes = document.len(), "configuration delivered");
        Ok(ApplyOutcome::Delivered {
            bytes: document.len(),
        })
    }

    /// Tear the plugin down and give back its sink.
    pub fn cleanup(self) -> K {
        info!("plugin cleanup finished");
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use yang_tree_core::{DataTree, Value};

    use super::{ApplyOutcome, Plugin};
    use crate::config::PluginConfig;
    use crate::delivery::{ConfigSink, DeliveryError};

    #[derive(Default)]
    struct RecordingSink {
        documents: Vec<String>,
        fail: bool,
    }

    impl ConfigSink for RecordingSink {
        fn deliver(&mut self, document: &str) -> Result<(), DeliveryError> {
            if self.fail {
                return Err(DeliveryError::Rejected {
                    result: 1,
                    text: "refused".to_string(),
                });
            }
            self.documents.push(document.to_string());
            Ok(())
        }
    }

    fn tree_with_timer(value: u32) -> DataTree {
        let mut tree = DataTree::new();
        tree.set_item(
            "/ietf-kea-dhcpv6:server/serv-attributes/valid-lifetime",
            Value::Uint32(value),
        )
        .expect("set");
        tree
    }

    #[test]
    fn init_and_changes_deliver_fresh_documents() {
        let mut plugin = Plugin::from_config(&PluginConfig::default(), RecordingSink::default());
        let mut tree = tree_with_timer(4000);

        let outcome = plugin.init(&mut tree).expect("init");
        assert!(matches!(outcome, ApplyOutcome::Delivered { .. }));

        tree.set_item(
            "/ietf-kea-dhcpv6:server/serv-attributes/valid-lifetime",
            Value::Uint32(8000),
        )
        .expect("update");
        plugin.on_change(&mut tree).expect("change");

        let sink = plugin.cleanup();
        assert_eq!(sink.documents.len(), 2);
        assert!(sink.documents[0].contains("\"valid-lifetime\": 4000"));
        assert!(sink.documents[1].contains("\"valid-lifetime\": 8000"));
    }

    #[test]
    fn empty_document_is_skipped() {
        let mut plugin = Plugin::from_config(&PluginConfig::default(), RecordingSink::default());
        let mut tree = DataTree::new();

        assert_eq!(plugin.init(&mut tree).expect("init"), ApplyOutcome::Skipped);
        assert!(plugin.sink().documents.is_empty());
    }

    #[test]
    fn delivered_outcome_reports_document_size() {
        let mut plugin = Plugin::from_config(&PluginConfig::default(), RecordingSink::default());
        let mut tree = tree_with_timer(60);

        let outcome = plugin.on_change(&mut tree).expect("change");
        let delivered = plugin.sink().documents[0].len();
        assert_eq!(outcome, ApplyOutcome::Delivered { bytes: delivered });
    }

    #[test]
    fn sink_failure_is_returned() {
        let sink = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };
        let mut plugin = Plugin::from_config(&PluginConfig::default(), sink);
        let mut tree = tree_with_timer(60);

        let err = plugin.on_change(&mut tree).expect_err("sink refuses");
        assert!(matches!(err, DeliveryError::Rejected { .. }));
    }
}
