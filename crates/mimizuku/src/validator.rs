//! One entry point for loading, converting, comparing, checking and reasoning

use std::path::Path;
use std::time::Duration;

use mimizuku_compare::{GraphComparator, GraphDiff};
use mimizuku_core::Graph;
use mimizuku_formats::{FormatCodec, FormatRegistry, RdfFormat};
use mimizuku_provenance::{ProvenanceMatcher, ProvenanceReport};
use mimizuku_reasoning::{
    CommandReasoner, FileOntologyLoader, Ontology, OntologyLoader, ReasoningEngine,
    ReasoningGateway, ReasoningOptions, ReasoningResult,
};
use tracing::{info, warn};

use crate::config::{MimizukuConfig, ReasoningConfig};
use crate::error::Result;

pub struct Validator {
    config: MimizukuConfig,
    registry: FormatRegistry,
    comparator: GraphComparator,
    provenance: ProvenanceMatcher,
    loader: FileOntologyLoader,
    gateway: Option<ReasoningGateway>,
}

impl Validator {
    /// Default configuration: built-in formats, no reasoning engine
    pub fn new() -> Self {
        Self::from_config(MimizukuConfig::default())
    }

    pub fn from_config(config: MimizukuConfig) -> Self {
        let gateway = command_engine(&config.reasoning).map(|engine| {
            ReasoningGateway::with_options(Box::new(engine), reasoning_options(&config.reasoning))
        });
        Self {
            comparator: GraphComparator::new((&config.comparison).into()),
            registry: FormatRegistry::builtin(),
            provenance: ProvenanceMatcher::new(),
            loader: FileOntologyLoader::new(),
            gateway,
            config,
        }
    }

    /// Use `engine` for [`Validator::perform_reasoning`], replacing any configured command
    pub fn with_engine(mut self, engine: Box<dyn ReasoningEngine>) -> Self {
        let options = reasoning_options(&self.config.reasoning);
        self.gateway = Some(ReasoningGateway::with_options(engine, options));
        self
    }

    /// Register an extra codec; a codec with a built-in name replaces it
    pub fn with_codec(mut self, codec: Box<dyn FormatCodec>) -> Self {
        self.registry.register(codec);
        self
    }

    pub fn config(&self) -> &MimizukuConfig {
        &self.config
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    pub fn supported_formats(&self) -> Vec<String> {
        self.registry.supported_formats()
    }

    pub fn load_graph<P: AsRef<Path>>(&self, path: P, format: &str) -> Result<Graph> {
        Ok(self.registry.load_graph(path, format)?)
    }

    /// Load in the configured default format
    pub fn load_default<P: AsRef<Path>>(&self, path: P) -> Result<Graph> {
        self.load_graph(path, &self.config.formats.default_format)
    }

    pub fn parse(&self, input: &str, format: &str) -> Result<Graph> {
        Ok(self.registry.parse(input, format)?)
    }

    pub fn serialize(&self, graph: &Graph, format: &str) -> Result<String> {
        Ok(self.registry.serialize(graph, format)?)
    }

    /// Re-encode `input` from one format into another
    pub fn convert(&self, input: &str, from: &str, to: &str) -> Result<String> {
        let graph = self.parse(input, from)?;
        self.serialize(&graph, to)
    }

    pub fn serialize_graph_to_turtle(&self, input: &str, input_format: &str) -> Result<String> {
        self.convert(input, input_format, RdfFormat::Turtle.name())
    }

    pub fn has_provenance(&self, graph: &Graph) -> bool {
        self.provenance.matches(graph)
    }

    pub fn provenance_report(&self, graph: &Graph) -> ProvenanceReport {
        self.provenance.scan(graph)
    }

    /// Graph equality up to blank node renaming
    pub fn compare(&self, a: &Graph, b: &Graph) -> Result<bool> {
        Ok(self.comparator.is_isomorphic(a, b)?)
    }

    pub fn diff(&self, a: &Graph, b: &Graph) -> Result<GraphDiff> {
        Ok(self.comparator.diff(a, b)?)
    }

    pub fn load_ontology<P: AsRef<Path>>(&self, path: P) -> Result<Ontology> {
        Ok(self.loader.load(path.as_ref())?)
    }

    /// Consistency check; never fails, problems are in the result
    pub fn perform_reasoning(&self, ontology: &Ontology) -> ReasoningResult {
        match &self.gateway {
            Some(gateway) => {
                let result = gateway.check_consistency(ontology);
                info!(
                    "Reasoning with {} finished: {:?}",
                    gateway.engine_name(),
                    result.status
                );
                result
            }
            None => {
                warn!("No reasoning engine configured");
                ReasoningResult::failure("", "No reasoning engine configured")
                    .for_ontology(ontology.id())
            }
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("formats", &self.registry.supported_formats())
            .field("comparator", self.comparator.config())
            .field("gateway", &self.gateway)
            .finish()
    }
}

fn reasoning_options(config: &ReasoningConfig) -> ReasoningOptions {
    ReasoningOptions {
        infer_property_values: config.infer_property_values,
        infer_data_property_values: config.infer_data_property_values,
    }
}

fn command_engine(config: &ReasoningConfig) -> Option<CommandReasoner> {
    let command = config.command.as_ref()?;
    let mut engine = CommandReasoner::new(command.program.clone())
        .args(command.args.iter().cloned())
        .input_format(command.input_format.clone());
    if let Some(format) = &command.output_format {
        engine = engine.output_format(format.clone());
    }
    if let Some(seconds) = config.timeout_secs {
        engine = engine.timeout(Duration::from_secs(seconds));
    }
    Some(engine)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROV_TURTLE: &str = "@prefix prov: <http://www.w3.org/ns/prov#> .\n@prefix ex: <http://example.org/> .\nex:document1 a prov:Entity ;\n    prov:wasAttributedTo ex:person1 .\n";

    #[test]
    fn test_convert_keeps_triples() {
        let validator = Validator::new();
        let json = validator.convert(PROV_TURTLE, "turtle", "json-ld").unwrap();
        let back = validator.parse(&json, "json-ld").unwrap();
        assert_eq!(back.len(), 2);
        assert!(validator.has_provenance(&back));
    }

    #[test]
    fn test_unsupported_format_is_a_format_error() {
        let err = Validator::new().parse(PROV_TURTLE, "csv").unwrap_err();
        assert!(matches!(err, crate::MimizukuError::Format(ref e) if e.is_unsupported_format()));
    }

    #[test]
    fn test_no_engine_configured() {
        let validator = Validator::new();
        let ontology = Ontology::new(Graph::new());
        let result = validator.perform_reasoning(&ontology);
        assert!(result.is_failure());
        assert_eq!(result.message, "No reasoning engine configured");
    }

    #[test]
    fn test_command_engine_from_config() {
        let config = MimizukuConfig::from_yaml_str(
            "reasoning:\n  command:\n    program: hermit\n    output_format: ntriples\n  timeout_secs: 5\n  infer_property_values: true\n",
        )
        .unwrap();
        let validator = Validator::from_config(config);
        let gateway = validator.gateway.as_ref().unwrap();
        assert_eq!(gateway.engine_name(), "hermit");
        assert!(gateway.options().infer_property_values);
        assert!(!gateway.options().infer_data_property_values);
    }

    #[test]
    fn test_comparison_limits_from_config() {
        let config = MimizukuConfig::from_yaml_str("comparison:\n  search_budget: 7\n").unwrap();
        let validator = Validator::from_config(config);
        assert_eq!(validator.comparator.config().search_budget, 7);
    }
}
