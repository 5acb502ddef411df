use super::machine::{AddMode, Automaton};
use quickcheck::{Arbitrary, Gen};
use std::{collections::HashSet, iter};

const DEPTH: usize = 4; // How deep the generated expressions nest.
const MAX_MATCHES: usize = 16; // Samples kept per subexpression.
const MAX_STATES: usize = 6;
const MAX_WORD_LEN: usize = 8;

/*
Generators for quickcheck: random expressions with strings they must match,
random NFAs built through the public API, and short words to feed them.
*/
#[derive(Debug, Clone)]
pub enum RegexQt {
    Lit(char),
    Or { a: Box<RegexQt>, b: Box<RegexQt> },
    Cat { a: Box<RegexQt>, b: Box<RegexQt> },
    Star(Box<RegexQt>),
}

impl RegexQt {
    fn lit(g: &mut Gen) -> Self {
        RegexQt::Lit(*g.choose(&['a', 'b']).unwrap())
    }

    fn new(g: &mut Gen, level: usize) -> Self {
        if level == 0 {
            return RegexQt::lit(g);
        }

        let choice = *g.choose(&[0, 1, 2, 3]).unwrap();
        match choice {
            0 => RegexQt::lit(g),
            1 => RegexQt::Or {
                a: Box::new(RegexQt::new(g, level - 1)),
                b: Box::new(RegexQt::new(g, level - 1)),
            },
            2 => RegexQt::Cat {
                a: Box::new(RegexQt::new(g, level - 1)),
                b: Box::new(RegexQt::new(g, level - 1)),
            },
            3 => RegexQt::Star(Box::new(RegexQt::new(g, level - 1))),
            _ => unreachable!("not a valid choice"),
        }
    }

    fn build_regex(&self) -> String {
        match self {
            RegexQt::Lit(c) => c.to_string(),
            RegexQt::Or { a, b } => format!("({}|{})", a.build_regex(), b.build_regex()),
            RegexQt::Cat { a, b } => format!("({}{})", a.build_regex(), b.build_regex()),
            RegexQt::Star(a) => format!("({})*", a.build_regex()),
        }
    }

    fn build_matches(&self) -> HashSet<String> {
        let mut res: HashSet<String> = match self {
            RegexQt::Lit(c) => iter::once(c.to_string()).collect(),
            RegexQt::Or { a, b } => {
                let mut res = a.build_matches();
                res.extend(b.build_matches());
                res
            }
            RegexQt::Cat { a, b } => {
                let abm = a.build_matches();
                let bbm = b.build_matches();
                let mut res = HashSet::with_capacity(abm.len() * bbm.len());
                for am in abm.iter() {
                    for bm in bbm.iter() {
                        res.insert(format!("{}{}", am, bm));
                    }
                }
                res
            }
            RegexQt::Star(a) => {
                let am = a.build_matches();
                let mut res: HashSet<String> = iter::once(String::new()).collect();
                for m in am.iter() {
                    res.insert(m.clone());
                    res.insert(m.repeat(2));
                }
                res
            }
        };

        if res.len() > MAX_MATCHES {
            res = res.into_iter().take(MAX_MATCHES).collect();
        }
        res
    }
}

#[derive(Debug, Clone)]
pub struct RegexCase {
    pub regex: String,
    pub matches: HashSet<String>,
}

impl Arbitrary for RegexCase {
    fn arbitrary(g: &mut Gen) -> Self {
        let level = g.size().min(DEPTH);

        let kind = RegexQt::new(g, level);
        let regex = kind.build_regex();
        let matches = kind.build_matches();

        Self { regex, matches }
    }
}

/// A structurally valid NFA over {a, b} with epsilon moves: `q0` is initial and
/// at least one state is final.
#[derive(Debug, Clone)]
pub struct NfaCase {
    pub nfa: Automaton,
}

impl Arbitrary for NfaCase {
    fn arbitrary(g: &mut Gen) -> Self {
        let states = usize::arbitrary(g) % MAX_STATES + 1;
        let mut nfa = Automaton::nfa();

        let mut finals: Vec<bool> = (0..states).map(|_| bool::arbitrary(g)).collect();
        if !finals.contains(&true) {
            let last = usize::arbitrary(g) % states;
            finals[last] = true;
        }
        for (i, is_final) in finals.into_iter().enumerate() {
            nfa.add_state(format!("q{}", i), is_final, AddMode::Strict)
                .unwrap();
        }

        let edges = usize::arbitrary(g) % (states * 3);
        for _ in 0..edges {
            let from = format!("q{}", usize::arbitrary(g) % states);
            let to = format!("q{}", usize::arbitrary(g) % states);
            let symbol = *g.choose(&[Some('a'), Some('b'), None]).unwrap();
            nfa.add_transition(&from, symbol, &to).unwrap();
        }

        Self { nfa }
    }
}

/// A short word over {a, b, c}; `c` never labels a generated transition.
#[derive(Debug, Clone)]
pub struct Word(pub String);

impl Arbitrary for Word {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % MAX_WORD_LEN;
        Word((0..len).map(|_| *g.choose(&['a', 'b', 'c']).unwrap()).collect())
    }
}
