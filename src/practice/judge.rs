const HALFWIDTH_SPACE: char = ' ';
const FULLWIDTH_SPACE: char = '\u{3000}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharSpan {
    Correct(char),
    Incorrect(char),
    LineBreak,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Judgement {
    pub spans: Vec<CharSpan>,
    pub complete: bool,
}

impl Judgement {
    pub fn mistakes(&self) -> usize {
        self.spans.iter().filter(|s| matches!(s, CharSpan::Incorrect(_))).count()
    }
}

fn equivalent(typed: char, expected: char) -> bool {
    typed == expected
        || matches!(
            (typed, expected),
            (HALFWIDTH_SPACE, FULLWIDTH_SPACE) | (FULLWIDTH_SPACE, HALFWIDTH_SPACE)
        )
}

/// Classifies every typed character against `target` and decides completion.
///
/// Completion also accepts input of the target's length whose classified
/// characters are all correct, so a half/fullwidth space swap still finishes
/// the card.
pub fn judge(target: &str, input: &str) -> Judgement {
    let expected: Vec<char> = target.chars().collect();
    let mut spans = Vec::new();
    let mut all_correct = true;
    let mut typed_len = 0;

    for (i, typed) in input.chars().enumerate() {
        typed_len += 1;

        if typed == '\n' {
            spans.push(CharSpan::LineBreak);
            continue;
        }

        match expected.get(i) {
            Some(&want) if equivalent(typed, want) => spans.push(CharSpan::Correct(typed)),
            _ => {
                all_correct = false;
                spans.push(CharSpan::Incorrect(typed));
            }
        }
    }

    let complete = input == target || (all_correct && typed_len == expected.len());

    Judgement { spans, complete }
}
