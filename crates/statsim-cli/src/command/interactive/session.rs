use std::ops::RangeInclusive;

use rand_pcg::Pcg32;
use statsim_core::{Dataset, Population, Sample, SampleError, SampleIndex, SamplingMethod};

/// Which data set the menu acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Selection {
    Population,
    Sample(SampleIndex),
}

/// The current population, the selection within it, and the session's RNG.
#[derive(Debug)]
pub(crate) struct Session {
    population: Population,
    selection: Selection,
    rng: Pcg32,
}

impl Session {
    pub fn new(population: Population, rng: Pcg32) -> Self {
        Self {
            population,
            selection: Selection::Population,
            rng,
        }
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// The selected sample, or `None` when the population is selected.
    pub fn selected_sample(&self) -> Option<&Sample> {
        match self.selection {
            Selection::Population => None,
            Selection::Sample(index) => self.population.sample(index),
        }
    }

    pub fn selected(&self) -> &dyn Dataset {
        match self.selected_sample() {
            Some(sample) => sample,
            None => &self.population,
        }
    }

    pub fn select_population(&mut self) {
        self.selection = Selection::Population;
    }

    /// Selects sample `index`; returns `false` if there is no such sample.
    pub fn select_sample(&mut self, index: usize) -> bool {
        let index = SampleIndex::from(index);
        if self.population.sample(index).is_none() {
            return false;
        }
        self.selection = Selection::Sample(index);
        true
    }

    /// Replaces the population; its samples go with it.
    pub fn replace_population(&mut self, population: Population) {
        self.population = population;
        self.selection = Selection::Population;
    }

    /// Draws `count` samples of `size` and returns the first and last index.
    pub fn draw_samples(
        &mut self,
        size: usize,
        method: SamplingMethod,
        count: usize,
    ) -> Result<RangeInclusive<SampleIndex>, SampleError> {
        let first = self
            .population
            .draw_sample(size, method, &mut self.rng)?
            .index();
        let mut last = first;
        for _ in 1..count {
            last = self
                .population
                .draw_sample(size, method, &mut self.rng)?
                .index();
        }
        Ok(first..=last)
    }
}

#[cfg(test)]
mod tests {
    use statsim_core::{Distribution, SimulationSeed};

    use super::*;

    fn session() -> Session {
        let values = (1..=20).map(f64::from).collect();
        let population = Population::from_values(values, Distribution::normal(10.5, 5.0).unwrap());
        Session::new(population, SimulationSeed::from(7).rng())
    }

    #[test]
    fn test_starts_on_population() {
        let session = session();
        assert_eq!(session.selection(), Selection::Population);
        assert_eq!(session.selected().name(), "Population");
        assert!(session.selected_sample().is_none());
    }

    #[test]
    fn test_draw_and_select() {
        let mut session = session();
        let range = session
            .draw_samples(5, SamplingMethod::WithoutReplacement, 3)
            .unwrap();
        assert_eq!(range.start().get(), 0);
        assert_eq!(range.end().get(), 2);
        assert_eq!(session.population().sample_count(), 3);

        assert!(session.select_sample(1));
        assert_eq!(session.selected().name(), "Sample #1");
        assert_eq!(session.selected().size(), 5);
        assert!(!session.select_sample(3));
        assert_eq!(session.selection(), Selection::Sample(SampleIndex::from(1)));

        session.select_population();
        assert_eq!(session.selected().name(), "Population");
    }

    #[test]
    fn test_replace_population_resets_selection() {
        let mut session = session();
        session
            .draw_samples(2, SamplingMethod::WithReplacement, 1)
            .unwrap();
        assert!(session.select_sample(0));

        let population =
            Population::from_values(vec![1.0, 2.0], Distribution::normal(1.5, 0.5).unwrap());
        session.replace_population(population);
        assert_eq!(session.selection(), Selection::Population);
        assert_eq!(session.population().sample_count(), 0);
    }

    #[test]
    fn test_draw_errors_leave_session_untouched() {
        let mut session = session();
        assert!(matches!(
            session.draw_samples(21, SamplingMethod::WithoutReplacement, 2),
            Err(SampleError::SizeExceedsPopulation { .. })
        ));
        assert_eq!(session.population().sample_count(), 0);
    }
}
