pub(crate) const QUIZ_ANSWERS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Question {
    pub(crate) prompt: String,
    pub(crate) answers: [String; QUIZ_ANSWERS],
    correct: [bool; QUIZ_ANSWERS],
}

/// Gate between picking something up and getting on with the game: a quiz
/// holds the world paused until the active question is answered with
/// exactly the right set of answers.
#[derive(Debug, Default)]
pub(crate) struct QuizManager {
    questions: Vec<Question>,
    answered: Vec<bool>,
    in_quiz: bool,
    current: Option<usize>,
}

impl QuizManager {
    /// Parses a question bank: per record, four non-empty lines (prompt
    /// and three answers) then a line with three truth flags.
    pub(crate) fn load(&mut self, path: &Path) -> Result<(), String> {
        let raw = fs::read_to_string(path)
            .map_err(|error| format!("read question bank {}: {error}", path.display()))?;
        let mut lines = raw.lines().map(str::trim).filter(|line| !line.is_empty());

        self.questions.clear();
        while let Some(prompt) = lines.next() {
            let mut answers: [String; QUIZ_ANSWERS] = Default::default();
            for (index, slot) in answers.iter_mut().enumerate() {
                *slot = lines
                    .next()
                    .ok_or_else(|| {
                        format!("question '{prompt}' is missing answer {}", index + 1)
                    })?
                    .to_string();
            }
            let flags_line = lines
                .next()
                .ok_or_else(|| format!("question '{prompt}' is missing its truth flags"))?;
            let mut flag_tokens = flags_line.split_whitespace();
            let mut correct = [false; QUIZ_ANSWERS];
            for (index, slot) in correct.iter_mut().enumerate() {
                let token = flag_tokens.next().ok_or_else(|| {
                    format!("question '{prompt}' is missing truth flag {}", index + 1)
                })?;
                *slot = parse_truth_flag(token)
                    .ok_or_else(|| format!("invalid truth flag '{token}' for '{prompt}'"))?;
            }
            self.questions.push(Question {
                prompt: prompt.to_string(),
                answers,
                correct,
            });
        }

        self.answered = vec![false; self.questions.len()];
        self.in_quiz = false;
        self.current = None;
        info!(path = %path.display(), questions = self.questions.len(), "question_bank_loaded");
        Ok(())
    }

    /// Enters quiz mode. With nothing left to ask the quiz ends before it
    /// starts.
    pub(crate) fn start(&mut self) {
        if self.answered.iter().all(|done| *done) {
            return;
        }
        self.in_quiz = true;
    }

    /// Picks a random unanswered question when quiz mode needs one.
    pub(crate) fn tick(&mut self) {
        if !self.in_quiz || self.current.is_some() {
            return;
        }
        let candidates: Vec<usize> = (0..self.questions.len())
            .filter(|index| !self.answered[*index])
            .collect();
        if candidates.is_empty() {
            self.in_quiz = false;
            return;
        }
        let pick = rand::thread_rng().gen_range(0..candidates.len());
        self.current = Some(candidates[pick]);
    }

    /// Judges a submitted answer set. Only an exact match with the
    /// question's truth flags ends the quiz; anything else keeps the same
    /// question on screen for another try.
    pub(crate) fn submit(&mut self, selection: [bool; QUIZ_ANSWERS]) -> bool {
        let Some(index) = self.current else {
            return false;
        };
        if self.questions[index].correct == selection {
            self.answered[index] = true;
            self.current = None;
            self.in_quiz = false;
            true
        } else {
            false
        }
    }

    pub(crate) fn in_quiz(&self) -> bool {
        self.in_quiz
    }

    pub(crate) fn current_question(&self) -> Option<&Question> {
        self.current.map(|index| &self.questions[index])
    }

    pub(crate) fn question_count(&self) -> usize {
        self.questions.len()
    }
}

fn parse_truth_flag(token: &str) -> Option<bool> {
    match token {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}
