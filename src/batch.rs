use core_affinity::CoreId;
use itertools::Itertools;
use log::warn;
use std::sync::mpsc::channel as mpsc_channel;
use std::sync::mpsc::{Receiver as MpscReceiver, Sender as MpscSender};
use std::sync::Arc;
use std::thread;
use std::thread::JoinHandle;

use crate::error::{SimError, SimResult};
use crate::evaluator::{Evaluator, SimulationResult};
use crate::params::{self, TechnicalParams};
use crate::translator::Translator;

/// Receives the fitness of successfully evaluated genomes. Implemented by the
/// evolutionary collaborator.
pub trait FitnessSink {
    fn set_fitness(&mut self, genome_id: usize, fitness: f64);
}

/// Spawns the worker pool. Candidates are independent, so workers share
/// nothing but the translator; each one evaluates whole genomes on its own
/// network instances.
pub fn create_batch_evaluator<T>(
    translator: Arc<T>,
    evaluator: Evaluator,
    technical_params: TechnicalParams,
) -> SimResult<BatchEvaluator<T::Genome>>
where
    T: Translator + Send + Sync + 'static,
    T::Genome: Send + 'static,
{
    params::validate_technical_params(&technical_params)?;

    let num_threads = technical_params.num_threads.unwrap_or_else(num_cpus::get);

    let (result_tx, result_rx) = mpsc_channel();
    let mut job_txs = Vec::with_capacity(num_threads);
    let mut join_handles = Vec::with_capacity(num_threads);

    for thread_id in 0..num_threads {
        let (job_tx, job_rx) = mpsc_channel::<(usize, T::Genome)>();
        job_txs.push(job_tx);

        let translator = Arc::clone(&translator);
        let evaluator = evaluator.clone();
        let result_tx = result_tx.clone();
        let pin_threads = technical_params.pin_threads;

        join_handles.push(thread::spawn(move || {
            if pin_threads {
                let core_id = CoreId { id: thread_id };
                core_affinity::set_for_current(core_id);
            }

            while let Ok((genome_id, genome)) = job_rx.recv() {
                let result = translator
                    .translate(&genome)
                    .and_then(|mut network| evaluator.simulate(&mut network));

                if result_tx.send((genome_id, result)).is_err() {
                    break;
                }
            }
        }));
    }

    Ok(BatchEvaluator {
        job_txs,
        result_rx,
        join_handles,
        next_worker: 0,
    })
}

pub struct BatchEvaluator<G: Send + 'static> {
    job_txs: Vec<MpscSender<(usize, G)>>,
    result_rx: MpscReceiver<(usize, SimResult<SimulationResult>)>,
    join_handles: Vec<JoinHandle<()>>,
    next_worker: usize,
}

impl<G: Send + 'static> BatchEvaluator<G> {
    pub fn num_workers(&self) -> usize {
        self.job_txs.len()
    }

    /// Evaluates one batch and returns per-genome outcomes sorted by genome
    /// id. A failed genome is reported in place; it never aborts the batch.
    pub fn evaluate(
        &mut self,
        genomes: Vec<(usize, G)>,
    ) -> Vec<(usize, SimResult<SimulationResult>)> {
        let num_genomes = genomes.len();

        for (genome_id, genome) in genomes {
            self.job_txs[self.next_worker]
                .send((genome_id, genome))
                .unwrap();
            self.next_worker = (self.next_worker + 1) % self.job_txs.len();
        }

        (0..num_genomes)
            .map(|_| self.result_rx.recv().unwrap())
            .sorted_by_key(|(genome_id, _)| *genome_id)
            .collect()
    }

    /// Evaluates one batch, reporting `1 - sum_squared_error` for every
    /// successful genome to the sink. Failures are returned to the caller,
    /// who decides between a sentinel fitness and exclusion.
    pub fn evaluate_into(
        &mut self,
        genomes: Vec<(usize, G)>,
        sink: &mut impl FitnessSink,
    ) -> Vec<(usize, SimError)> {
        let mut failures = Vec::new();

        for (genome_id, result) in self.evaluate(genomes) {
            match result {
                Ok(simulation_result) => {
                    sink.set_fitness(genome_id, simulation_result.fitness());
                }
                Err(error) => {
                    warn!("evaluation of genome {} failed: {}", genome_id, error);
                    failures.push((genome_id, error));
                }
            }
        }

        failures
    }
}

impl<G: Send + 'static> Drop for BatchEvaluator<G> {
    fn drop(&mut self) {
        self.job_txs.clear(); // signals the worker threads to exit the loop

        self.join_handles.drain(..).for_each(|join_handle| {
            join_handle.join().ok();
        });
    }
}
