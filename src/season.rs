use rand::Rng;

use crate::error::Result;
use crate::scoring::{play_game, GameResult, ScoringModel};
use crate::team::Roster;

/// A scheduled regular-season game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fixture {
    pub home: String,
    pub away: String,
}

impl Fixture {
    pub fn new(home: &str, away: &str) -> Self {
        Fixture {
            home: home.to_string(),
            away: away.to_string(),
        }
    }
}

impl From<&GameResult> for Fixture {
    fn from(game: &GameResult) -> Self {
        Fixture::new(&game.home, &game.away)
    }
}

/// Play every fixture in schedule order. The returned results line up with
/// `fixtures`.
pub fn play_season<M: ScoringModel, R: Rng + ?Sized>(
    fixtures: &[Fixture],
    model: &M,
    roster: &mut Roster,
    rng: &mut R,
) -> Result<Vec<GameResult>> {
    fixtures
        .iter()
        .map(|f| play_game(model, roster, &f.home, &f.away, &mut *rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::NormalScoring;
    use crate::team::TeamStats;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn roster() -> Roster {
        vec![
            TeamStats::new("A", vec![100.0, 110.0, 105.0], vec![98.0, 102.0, 100.0]).unwrap(),
            TeamStats::new("B", vec![95.0, 101.0, 99.0], vec![104.0, 108.0, 100.0]).unwrap(),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_results_align_with_fixtures() {
        let fixtures = vec![Fixture::new("A", "B"), Fixture::new("B", "A"), Fixture::new("A", "B")];
        let mut roster = roster();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let results = play_season(&fixtures, &NormalScoring::default(), &mut roster, &mut rng).unwrap();
        assert_eq!(results.len(), fixtures.len());
        for (fixture, game) in fixtures.iter().zip(&results) {
            assert_eq!(Fixture::from(game), *fixture);
        }
    }

    #[test]
    fn test_season_deterministic() {
        let fixtures: Vec<Fixture> = (0..50).map(|_| Fixture::new("A", "B")).collect();
        let model = NormalScoring::new(true);

        let first = play_season(&fixtures, &model, &mut roster(), &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        let second = play_season(&fixtures, &model, &mut roster(), &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        assert_eq!(first, second);
    }
}
