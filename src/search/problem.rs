//! The strip packing problem as seen by the GA, SA and Tabu runners.

use super::decoder::Decoder;
use crate::error::{Result, StripError};
use crate::ga::{operators, Fitness, GaProblem, Individual};
use crate::model::{Instance, RectId, Solution};
use crate::sa::SaProblem;
use crate::tabu::{TabuMove, TabuProblem};
use rand::seq::SliceRandom;
use rand::Rng;

/// Search representation: an item order plus one orientation bit per item.
///
/// `order` permutes positions into [`Instance::rectangles`]. `flips` is
/// indexed by item position, not by place in the order, so an item keeps
/// its bit when the order changes. Bits of items that may not rotate are
/// always `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genome {
    pub order: Vec<usize>,
    pub flips: Vec<bool>,
    /// Decoded strip height; `i64::MAX` until evaluated.
    pub height: i64,
}

impl Genome {
    /// Identity order with no flips.
    pub fn identity(n: usize) -> Self {
        Self {
            order: (0..n).collect(),
            flips: vec![false; n],
            height: i64::worst(),
        }
    }
}

impl Individual for Genome {
    type Fitness = i64;

    fn fitness(&self) -> i64 {
        self.height
    }

    fn set_fitness(&mut self, fitness: i64) {
        self.height = fitness;
    }
}

/// Binds an instance and a decoder into a problem for the generic runners.
///
/// Decoding failures evaluate to the worst fitness; callers are expected to
/// run [`check_geometry`](crate::heuristic::check_geometry) first so that
/// every genome decodes.
pub struct StripProblem<'a, D: Decoder> {
    instance: &'a Instance,
    decoder: &'a D,
    allow_rotation: bool,
    /// `rotatable[i]`: whether the item at position `i` may rotate.
    rotatable: Vec<bool>,
    flip_probability: f64,
}

impl<'a, D: Decoder> StripProblem<'a, D> {
    pub fn new(instance: &'a Instance, decoder: &'a D, allow_rotation: bool) -> Self {
        let rotatable = instance
            .rectangles()
            .iter()
            .map(|r| r.can_rotate(allow_rotation))
            .collect();
        Self {
            instance,
            decoder,
            allow_rotation,
            rotatable,
            flip_probability: 0.5,
        }
    }

    /// Probability that a tabu candidate also flips one bit.
    ///
    /// # Errors
    ///
    /// [`StripError::Configuration`] unless `p` is in `[0, 1]`.
    pub fn with_flip_probability(mut self, p: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(StripError::config(format!(
                "flip_probability must be in [0, 1], got {p}"
            )));
        }
        self.flip_probability = p;
        Ok(self)
    }

    pub fn instance(&self) -> &Instance {
        self.instance
    }

    pub fn len(&self) -> usize {
        self.rotatable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotatable.is_empty()
    }

    /// Decodes a genome into a full solution.
    pub fn decode(&self, genome: &Genome) -> Result<Solution> {
        self.decoder
            .decode(self.instance, &genome.order, &genome.flips, self.allow_rotation)
    }

    /// Strip height of a genome, or the worst height when decoding fails.
    pub fn height(&self, genome: &Genome) -> i64 {
        match self.decode(genome) {
            Ok(solution) => solution.height,
            Err(err) => {
                log::debug!("decode failed: {err}");
                i64::worst()
            }
        }
    }

    /// A uniformly random order with random bits on rotatable items.
    pub fn random_genome<R: Rng>(&self, rng: &mut R) -> Genome {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(rng);
        let flips = self
            .rotatable
            .iter()
            .map(|&r| r && rng.random_bool(0.5))
            .collect();
        Genome {
            order,
            flips,
            height: i64::worst(),
        }
    }

    fn clear_locked_bits(&self, genome: &mut Genome) {
        for (bit, &r) in genome.flips.iter_mut().zip(&self.rotatable) {
            *bit &= r;
        }
    }

    /// Flips the bit of one random item (a no-op for items that may not rotate).
    fn flip_one<R: Rng>(&self, genome: &mut Genome, rng: &mut R) {
        if genome.flips.is_empty() {
            return;
        }
        let k = rng.random_range(0..genome.flips.len());
        genome.flips[k] = !genome.flips[k] && self.rotatable[k];
    }

    /// Tabu key of swapping two order positions: the unordered id pair.
    fn swap_key(&self, genome: &Genome, i: usize, j: usize) -> (RectId, RectId) {
        let rects = self.instance.rectangles();
        let a = rects[genome.order[i]].id;
        let b = rects[genome.order[j]].id;
        (a.min(b), a.max(b))
    }
}

impl<D: Decoder> GaProblem for StripProblem<'_, D> {
    type Individual = Genome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Genome {
        self.random_genome(rng)
    }

    fn evaluate(&self, genome: &Genome) -> i64 {
        self.height(genome)
    }

    fn crossover<R: Rng>(&self, p1: &Genome, p2: &Genome, rng: &mut R) -> Vec<Genome> {
        if self.is_empty() {
            return vec![p1.clone()];
        }
        let mut child = Genome {
            order: operators::order_crossover(&p1.order, &p2.order, rng),
            flips: operators::uniform_crossover(&p1.flips, &p2.flips, rng),
            height: i64::worst(),
        };
        self.clear_locked_bits(&mut child);
        vec![child]
    }

    fn mutate<R: Rng>(&self, genome: &mut Genome, rng: &mut R) {
        operators::swap_mutation(&mut genome.order, rng);
    }

    fn flip_bits<R: Rng>(&self, genome: &mut Genome, rate: f64, rng: &mut R) {
        if operators::flip_bits(&mut genome.flips, rate, rng) > 0 {
            self.clear_locked_bits(genome);
        }
    }
}

impl<D: Decoder> SaProblem for StripProblem<'_, D> {
    type Solution = Genome;

    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Genome {
        self.random_genome(rng)
    }

    fn cost(&self, genome: &Genome) -> f64 {
        self.height(genome) as f64
    }

    /// Swaps two random positions and flips one random bit.
    fn neighbor<R: Rng>(&self, genome: &Genome, rng: &mut R) -> Genome {
        let mut next = genome.clone();
        operators::swap_mutation(&mut next.order, rng);
        self.flip_one(&mut next, rng);
        next
    }
}

impl<D: Decoder> TabuProblem for StripProblem<'_, D> {
    type Solution = Genome;
    type Key = (RectId, RectId);

    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Genome {
        self.random_genome(rng)
    }

    fn cost(&self, genome: &Genome) -> f64 {
        self.height(genome) as f64
    }

    /// `size` random swaps, each combined with a bit flip with probability
    /// `flip_probability`. Empty for fewer than two items.
    fn neighbors<R: Rng>(
        &self,
        genome: &Genome,
        size: usize,
        rng: &mut R,
    ) -> Vec<TabuMove<Genome, (RectId, RectId)>> {
        if self.len() < 2 {
            return Vec::new();
        }
        (0..size)
            .map(|_| {
                let (i, j) = operators::distinct_pair(self.len(), rng);
                let key = self.swap_key(genome, i, j);
                let mut next = genome.clone();
                next.order.swap(i, j);
                if rng.random_bool(self.flip_probability) {
                    self.flip_one(&mut next, rng);
                }
                TabuMove {
                    solution: next,
                    key,
                }
            })
            .collect()
    }
}
