//! Quiz mini-game: question selection without repeats, answer checking,
//! scoring and the timed feedback that follows each answer.

use std::collections::HashSet;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::QuizTuning;
use crate::sim::collision::Rect;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub answers: Vec<String>,
    pub correct: usize,
}

impl QuizQuestion {
    /// Shown when a planet has no questions of its own.
    pub fn placeholder(planet: &str) -> Self {
        Self {
            prompt: format!("What would you like to learn about {planet}?"),
            answers: vec![
                "Its size".to_string(),
                "Its moons".to_string(),
                "Its weather".to_string(),
                "Everything!".to_string(),
            ],
            correct: 3,
        }
    }

    pub fn correct_answer(&self) -> &str {
        self.answers.get(self.correct).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

pub fn check_answer(selected: usize, question: &QuizQuestion) -> Verdict {
    if selected == question.correct {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}

/// Draw a question index uniformly from those not yet in `used`, recording
/// the draw. Once every question has been used the set starts over.
/// Returns `None` only for an empty bank.
pub fn next_question(bank: &[QuizQuestion], used: &mut HashSet<usize>, rng: &mut impl Rng) -> Option<usize> {
    if bank.is_empty() {
        return None;
    }
    let mut available: Vec<usize> = (0..bank.len()).filter(|i| !used.contains(i)).collect();
    if available.is_empty() {
        used.clear();
        available = (0..bank.len()).collect();
    }
    let pick = available[rng.gen_range(0..available.len())];
    used.insert(pick);
    Some(pick)
}

/// What the quiz screen is showing after an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    None,
    Correct { frames: u32 },
    Wrong { frames: u32 },
    /// The correct answer is highlighted before moving on.
    Reveal { frames: u32 },
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    pub planet: String,
    bank: Vec<QuizQuestion>,
    used: HashSet<usize>,
    current: usize,
    pub feedback: Feedback,
    /// Set after every answer. The world moves the rocket back to the quiz
    /// anchor and clears it.
    pub reposition_pending: bool,
    pub asked: u32,
    pub right: u32,
    tuning: QuizTuning,
}

impl QuizSession {
    pub fn new(planet: &str, bank: &[QuizQuestion], tuning: QuizTuning, rng: &mut impl Rng) -> Self {
        let bank: Vec<QuizQuestion> = bank
            .iter()
            .filter(|q| q.correct < q.answers.len())
            .cloned()
            .collect();
        let bank = if bank.is_empty() {
            log::warn!("No quiz questions for {planet}, using placeholder");
            vec![QuizQuestion::placeholder(planet)]
        } else {
            bank
        };
        let mut session = Self {
            planet: planet.to_string(),
            bank,
            used: HashSet::new(),
            current: 0,
            feedback: Feedback::None,
            reposition_pending: false,
            asked: 0,
            right: 0,
            tuning,
        };
        session.advance(rng);
        session
    }

    pub fn question(&self) -> &QuizQuestion {
        &self.bank[self.current]
    }

    pub fn accepting(&self) -> bool {
        self.feedback == Feedback::None
    }

    /// Score `selected` against the current question. Ignored while feedback
    /// is showing or when `selected` is not one of the answers.
    pub fn answer(&mut self, selected: usize, score: &mut u32, rng: &mut impl Rng) -> Option<Verdict> {
        if !self.accepting() || selected >= self.question().answers.len() {
            return None;
        }
        let verdict = check_answer(selected, self.question());
        self.asked += 1;
        match verdict {
            Verdict::Correct => {
                *score = score.saturating_add(self.tuning.reward);
                self.right += 1;
                self.feedback = Feedback::Correct {
                    frames: self.tuning.correct_display,
                };
                self.advance(rng);
            }
            Verdict::Incorrect => {
                *score = score.saturating_sub(self.tuning.penalty);
                self.feedback = Feedback::Wrong {
                    frames: self.tuning.wrong_display,
                };
            }
        }
        self.reposition_pending = true;
        log::info!("Quiz answer on {}: {:?}, score {}", self.planet, verdict, score);
        Some(verdict)
    }

    /// Advance the feedback timers by one frame.
    pub fn tick(&mut self, rng: &mut impl Rng) {
        self.feedback = match self.feedback {
            Feedback::None => Feedback::None,
            Feedback::Correct { frames } if frames > 1 => Feedback::Correct { frames: frames - 1 },
            Feedback::Correct { .. } => Feedback::None,
            Feedback::Wrong { frames } if frames > 1 => Feedback::Wrong { frames: frames - 1 },
            Feedback::Wrong { .. } => Feedback::Reveal {
                frames: self.tuning.reveal_display,
            },
            Feedback::Reveal { frames } if frames > 1 => Feedback::Reveal { frames: frames - 1 },
            Feedback::Reveal { .. } => {
                self.advance(rng);
                Feedback::None
            }
        };
    }

    /// Clears and returns the reposition request.
    pub fn take_reposition(&mut self) -> bool {
        std::mem::take(&mut self.reposition_pending)
    }

    fn advance(&mut self, rng: &mut impl Rng) {
        self.current = next_question(&self.bank, &mut self.used, rng).unwrap_or(0);
    }
}

/// The four answer boxes in a 2×2 grid, in answer order.
pub fn answer_rects(size: Vec2) -> [Rect; 4] {
    let (w, h) = (size.x, size.y);
    [
        Rect::new(w / 4.0 - 150.0, h / 2.0 - 100.0, 300.0, 50.0),
        Rect::new(w * 3.0 / 4.0 - 150.0, h / 2.0 - 100.0, 300.0, 50.0),
        Rect::new(w / 4.0 - 150.0, h / 2.0 + 50.0, 300.0, 50.0),
        Rect::new(w * 3.0 / 4.0 - 150.0, h / 2.0 + 50.0, 300.0, 50.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bank(n: usize) -> Vec<QuizQuestion> {
        (0..n)
            .map(|i| QuizQuestion {
                prompt: format!("Q{i}"),
                answers: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct: i % 4,
            })
            .collect()
    }

    #[test]
    fn test_no_repeat_until_exhausted() {
        let bank = bank(6);
        let mut used = HashSet::new();
        let mut rng = StdRng::seed_from_u64(31);
        let mut seen = HashSet::new();
        for _ in 0..6 {
            let i = next_question(&bank, &mut used, &mut rng).unwrap();
            assert!(seen.insert(i), "question {i} repeated");
        }
        assert_eq!(used.len(), 6);
        // Exhausted: the pool starts over.
        next_question(&bank, &mut used, &mut rng).unwrap();
        assert_eq!(used.len(), 1);
    }

    #[test]
    fn test_draw_is_roughly_uniform() {
        let bank = bank(6);
        let mut rng = StdRng::seed_from_u64(32);
        let mut counts = [0u32; 6];
        for _ in 0..6000 {
            let mut used = HashSet::new();
            counts[next_question(&bank, &mut used, &mut rng).unwrap()] += 1;
        }
        for c in counts {
            assert!((800..1200).contains(&c), "skewed counts {counts:?}");
        }
    }

    #[test]
    fn test_cycles_cover_bank_evenly() {
        let n = 7;
        let bank = bank(n);
        let mut used = HashSet::new();
        let mut rng = StdRng::seed_from_u64(36);
        let mut counts = vec![0u32; n];
        for _ in 0..10 * n {
            counts[next_question(&bank, &mut used, &mut rng).unwrap()] += 1;
        }
        assert!(counts.iter().all(|&c| c == 10), "uneven counts {counts:?}");
    }

    #[test]
    fn test_empty_bank() {
        let mut used = HashSet::new();
        let mut rng = StdRng::seed_from_u64(33);
        assert_eq!(next_question(&[], &mut used, &mut rng), None);

        let session = QuizSession::new("Pluto", &[], QuizTuning::default(), &mut rng);
        assert_eq!(session.question(), &QuizQuestion::placeholder("Pluto"));
    }

    #[test]
    fn test_three_correct_answers_score_thirty() {
        let catalog = Catalog::builtin();
        let mars = catalog.planet("Mars").unwrap();
        let mut rng = StdRng::seed_from_u64(34);
        let mut session = QuizSession::new("Mars", &mars.quiz, QuizTuning::default(), &mut rng);
        let mut score = 0;
        for _ in 0..3 {
            while !session.accepting() {
                session.tick(&mut rng);
            }
            let right = session.question().correct;
            assert_eq!(session.answer(right, &mut score, &mut rng), Some(Verdict::Correct));
            assert!(session.take_reposition());
        }
        assert_eq!(score, 30);
        assert_eq!(session.right, 3);
    }

    #[test]
    fn test_wrong_answer_floors_at_zero() {
        let mut rng = StdRng::seed_from_u64(35);
        let mut session = QuizSession::new("Test", &bank(4), QuizTuning::default(), &mut rng);
        let mut score = 3;
        let wrong = (session.question().correct + 1) % 4;
        assert_eq!(session.answer(wrong, &mut score, &mut rng), Some(Verdict::Incorrect));
        assert_eq!(score, 0);
        assert!(session.reposition_pending);
    }

    #[test]
    fn test_answers_ignored_during_feedback() {
        let mut rng = StdRng::seed_from_u64(36);
        let mut session = QuizSession::new("Test", &bank(4), QuizTuning::default(), &mut rng);
        let mut score = 0;
        let right = session.question().correct;
        session.answer(right, &mut score, &mut rng);
        let next_right = session.question().correct;
        assert_eq!(session.answer(next_right, &mut score, &mut rng), None);
        assert_eq!(score, 10);
    }

    #[test]
    fn test_wrong_then_reveal_then_next() {
        let tuning = QuizTuning::default();
        let mut rng = StdRng::seed_from_u64(37);
        let mut session = QuizSession::new("Test", &bank(4), tuning.clone(), &mut rng);
        let mut score = 20;
        let before = session.question().clone();
        session.answer((before.correct + 1) % 4, &mut score, &mut rng);
        for _ in 0..tuning.wrong_display {
            session.tick(&mut rng);
        }
        assert_eq!(session.feedback, Feedback::Reveal { frames: tuning.reveal_display });
        assert_eq!(session.question(), &before);
        for _ in 0..tuning.reveal_display {
            session.tick(&mut rng);
        }
        assert!(session.accepting());
        assert_ne!(session.question(), &before);
    }

    #[test]
    fn test_out_of_range_answer_ignored() {
        let mut rng = StdRng::seed_from_u64(38);
        let mut session = QuizSession::new("Test", &bank(2), QuizTuning::default(), &mut rng);
        let mut score = 0;
        assert_eq!(session.answer(7, &mut score, &mut rng), None);
        assert!(session.accepting());
    }

    #[test]
    fn test_answer_grid_is_disjoint() {
        let rects = answer_rects(Vec2::new(1200.0, 800.0));
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert!(!rects[i].overlaps(&rects[j]));
            }
        }
    }
}
