//! Feed-forward network used as the navigation controller.
//!
//! The network has one hidden layer:
//!
//! ```text
//! 4 sensor inputs → hidden (tanh) → 4 direction scores (tanh)
//! ```
//!
//! All parameters live in one flat vector so the genetic operators can treat a network as
//! a plain weight vector. For every unit the incoming weights come first, followed by its
//! bias; hidden units come before output units.

use gridpath_engine::{ACTION_COUNT, Controller, SENSOR_COUNT, SensorInputs};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::weights;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum NetworkShapeError {
    #[display("network needs at least one hidden unit")]
    NoHiddenUnits,
    #[display("network with {hidden} hidden units needs {expected} weights, got {actual}")]
    WeightCount {
        hidden: usize,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct NetworkParams {
    hidden: usize,
    weights: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NetworkParams", into = "NetworkParams")]
pub struct FeedForwardNetwork {
    hidden: usize,
    weights: Vec<f64>,
}

impl TryFrom<NetworkParams> for FeedForwardNetwork {
    type Error = NetworkShapeError;

    fn try_from(params: NetworkParams) -> Result<Self, Self::Error> {
        Self::from_weights(params.hidden, params.weights)
    }
}

impl From<FeedForwardNetwork> for NetworkParams {
    fn from(network: FeedForwardNetwork) -> Self {
        Self {
            hidden: network.hidden,
            weights: network.weights,
        }
    }
}

impl FeedForwardNetwork {
    /// Number of parameters of a network with `hidden` hidden units.
    #[must_use]
    pub const fn weight_count(hidden: usize) -> usize {
        hidden * (SENSOR_COUNT + 1) + ACTION_COUNT * (hidden + 1)
    }

    pub fn from_weights(hidden: usize, weights: Vec<f64>) -> Result<Self, NetworkShapeError> {
        if hidden == 0 {
            return Err(NetworkShapeError::NoHiddenUnits);
        }
        let expected = Self::weight_count(hidden);
        if weights.len() != expected {
            return Err(NetworkShapeError::WeightCount {
                hidden,
                expected,
                actual: weights.len(),
            });
        }
        Ok(Self { hidden, weights })
    }

    /// Creates a network with weights uniform in `[-max_weight, max_weight]`.
    ///
    /// # Panics
    ///
    /// Panics if `hidden` is zero.
    pub fn random<R>(hidden: usize, max_weight: f64, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        assert!(hidden > 0, "network needs at least one hidden unit");
        Self {
            hidden,
            weights: weights::random(rng, max_weight, Self::weight_count(hidden)),
        }
    }

    /// Returns a network of the same shape with different weights.
    ///
    /// # Panics
    ///
    /// Panics if the weight count does not match this network.
    #[must_use]
    pub fn with_weights(&self, weights: Vec<f64>) -> Self {
        assert_eq!(weights.len(), self.weights.len(), "weight count mismatch");
        Self {
            hidden: self.hidden,
            weights,
        }
    }

    #[must_use]
    pub fn hidden(&self) -> usize {
        self.hidden
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Runs the network on `inputs`.
    #[must_use]
    pub fn forward(&self, inputs: &SensorInputs) -> [f64; ACTION_COUNT] {
        let (hidden_weights, output_weights) =
            self.weights.split_at(self.hidden * (SENSOR_COUNT + 1));
        let hidden = hidden_weights
            .chunks_exact(SENSOR_COUNT + 1)
            .map(|unit| activate(unit, inputs))
            .collect::<Vec<_>>();

        let mut outputs = [0.0; ACTION_COUNT];
        for (out, unit) in outputs
            .iter_mut()
            .zip(output_weights.chunks_exact(self.hidden + 1))
        {
            *out = activate(unit, &hidden);
        }
        outputs
    }
}

/// `tanh(w · x + b)` where `unit` holds the weights followed by the bias.
fn activate(unit: &[f64], inputs: &[f64]) -> f64 {
    let (bias, weights) = unit.split_last().map_or((0.0, unit), |(b, w)| (*b, w));
    let sum = weights.iter().zip(inputs).map(|(w, x)| w * x).sum::<f64>();
    (sum + bias).tanh()
}

impl Controller for FeedForwardNetwork {
    fn decide(&self, inputs: &SensorInputs) -> Vec<f64> {
        self.forward(inputs).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use gridpath_engine::{Direction, select_direction};

    use super::*;

    #[test]
    fn test_weight_count() {
        assert_eq!(FeedForwardNetwork::weight_count(1), 5 + 8);
        assert_eq!(FeedForwardNetwork::weight_count(6), 30 + 28);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert_eq!(
            FeedForwardNetwork::from_weights(0, vec![]),
            Err(NetworkShapeError::NoHiddenUnits)
        );
        assert_eq!(
            FeedForwardNetwork::from_weights(2, vec![0.0; 3]),
            Err(NetworkShapeError::WeightCount {
                hidden: 2,
                expected: 22,
                actual: 3
            })
        );
    }

    #[test]
    fn test_forward_by_hand() {
        // One hidden unit copying input 3 (Right); outputs are -h, h, 0, bias-only 0.5.
        let weights = vec![
            0.0, 0.0, 0.0, 1.0, 0.0, // hidden unit
            -1.0, 0.0, // output 0
            1.0, 0.0, // output 1
            0.0, 0.0, // output 2
            0.0, 0.5, // output 3
        ];
        let network = FeedForwardNetwork::from_weights(1, weights).unwrap();
        let outputs = network.forward(&[0.0, 0.0, 0.0, 1.0]);
        let h = 1.0_f64.tanh();
        assert_eq!(outputs[0], (-h).tanh());
        assert_eq!(outputs[1], h.tanh());
        assert_eq!(outputs[2], 0.0);
        assert_eq!(outputs[3], 0.5_f64.tanh());
        assert_eq!(
            select_direction(&network.decide(&[0.0, 0.0, 0.0, 1.0])),
            Ok(Direction::Up)
        );
    }

    #[test]
    fn test_outputs_are_bounded() {
        let mut rng = rand::rng();
        let network = FeedForwardNetwork::random(5, 10.0, &mut rng);
        let outputs = network.forward(&[1.0, -1.0, 0.3, -0.7]);
        assert!(outputs.iter().all(|o| (-1.0..=1.0).contains(o)));
    }

    #[test]
    fn test_json_validates_shape() {
        let network = FeedForwardNetwork::random(3, 1.0, &mut rand::rng());
        let json = serde_json::to_string(&network).unwrap();
        let back: FeedForwardNetwork = serde_json::from_str(&json).unwrap();
        assert_eq!(back.hidden(), 3);
        for (a, b) in back.weights().iter().zip(network.weights()) {
            assert!((a - b).abs() < 1e-12);
        }

        let err = serde_json::from_str::<FeedForwardNetwork>(r#"{"hidden": 2, "weights": [1.0]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("needs 22 weights"));
    }
}
