use crate::error::{SimError, SimResult};
use crate::model::{self, NeuronState};
use crate::params::{NeuronParams, NeuronRole};

#[derive(Debug, Clone)]
pub struct Neuron {
    id: usize,
    role: NeuronRole,
    bias: f64,
    params: NeuronParams,
    state: NeuronState,
}

impl Neuron {
    pub fn new(id: usize, role: NeuronRole, params: NeuronParams, bias: f64) -> Self {
        Self {
            id,
            role,
            bias,
            params,
            state: NeuronState::resting(&params),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn role(&self) -> NeuronRole {
        self.role
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn potential(&self) -> f64 {
        self.state.membrane_potential
    }

    pub fn recovery(&self) -> f64 {
        self.state.recovery
    }

    pub fn advance(&mut self, input_current: f64, dt: f64) -> SimResult<bool> {
        let (next, fired) = model::step(self.state, &self.params, input_current, dt);

        if !next.membrane_potential.is_finite() || !next.recovery.is_finite() {
            return Err(SimError::NonFiniteState { neuron_id: self.id });
        }

        self.state = next;
        Ok(fired)
    }

    pub fn reset(&mut self) {
        self.state = NeuronState::resting(&self.params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::NeuronPreset;
    use float_cmp::assert_approx_eq;

    const DT: f64 = 0.25;

    fn make_neuron(bias: f64) -> Neuron {
        Neuron::new(3, NeuronRole::Hidden, NeuronPreset::FastSpiking.params(), bias)
    }

    #[test]
    fn starts_at_rest() {
        let neuron = make_neuron(0.0);
        assert_eq!(neuron.id(), 3);
        assert_eq!(neuron.role(), NeuronRole::Hidden);
        assert_approx_eq!(f64, neuron.potential(), -65.0);
        assert_approx_eq!(f64, neuron.recovery(), -13.0);
    }

    #[test]
    fn advance_mutates_state_and_reports_spike() {
        let mut neuron = make_neuron(0.0);
        let mut fired_at = None;

        for j in 0..200 {
            if neuron.advance(10.0, DT).unwrap() {
                fired_at = Some(j);
                break;
            }
        }

        assert!(fired_at.is_some());
        assert_approx_eq!(f64, neuron.potential(), -65.0);
    }

    #[test]
    fn reset_restores_resting_state() {
        let mut neuron = make_neuron(0.0);

        for _ in 0..10 {
            neuron.advance(10.0, DT).unwrap();
        }
        assert!(neuron.potential() > -65.0);

        neuron.reset();
        assert_approx_eq!(f64, neuron.potential(), -65.0);
        assert_approx_eq!(f64, neuron.recovery(), -13.0);
    }

    #[test]
    fn non_finite_current_is_an_error() {
        let mut neuron = make_neuron(0.0);
        let result = neuron.advance(f64::NAN, DT);

        assert_eq!(result, Err(SimError::NonFiniteState { neuron_id: 3 }));

        // the stored state is untouched by the failed step
        assert_approx_eq!(f64, neuron.potential(), -65.0);
    }
}
