use crate::error::SimResult;
use crate::network::{create_network, Network};
use crate::params::NetworkParams;

/// Builds a phenotype network from a candidate genome. The simulation core
/// has no knowledge of the genome representation; evolutionary collaborators
/// implement this for their own genome types.
pub trait Translator {
    type Genome;

    fn translate(&self, genome: &Self::Genome) -> SimResult<Network>;
}

/// Identity translation for callers whose genomes already are network
/// descriptions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectTranslator;

impl Translator for DirectTranslator {
    type Genome = NetworkParams;

    fn translate(&self, genome: &NetworkParams) -> SimResult<Network> {
        create_network(genome.clone())
    }
}
