use super::{
    machine::{Automaton, Kind, EPSILON},
    stateid::StateId,
};
use crate::error::{Error, Result};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Symbol(char),
    Union,
    Star,
    Concat,
    Open,
    Close,
}

impl Token {
    fn precedence(&self) -> u8 {
        match self {
            Token::Star => 3,
            Token::Concat => 2,
            Token::Union => 1,
            _ => 0,
        }
    }
}

fn invalid<S: Into<String>>(reason: S) -> Error {
    Error::InvalidExpression(reason.into())
}

fn tokenize(regex: &str) -> Result<Vec<Token>> {
    regex
        .chars()
        .map(|c| match c {
            '|' => Ok(Token::Union),
            '*' => Ok(Token::Star),
            '(' => Ok(Token::Open),
            ')' => Ok(Token::Close),
            EPSILON => Err(invalid("`ε` is reserved for epsilon transitions")),
            c if c.is_alphanumeric() => Ok(Token::Symbol(c)),
            c => Err(invalid(format!("unsupported character `{}`", c))),
        })
        .collect()
}

/// Makes concatenation explicit: "a(b|c)*d" -> "a.(b|c)*.d".
fn insert_concatenation(tokens: Vec<Token>) -> Vec<Token> {
    let mut result = Vec::with_capacity(tokens.len() * 2);
    let mut previous: Option<Token> = None;

    for token in tokens {
        if let Some(left) = previous {
            let left_closes = matches!(left, Token::Symbol(_) | Token::Close | Token::Star);
            let right_opens = matches!(token, Token::Symbol(_) | Token::Open);
            if left_closes && right_opens {
                result.push(Token::Concat);
            }
        }
        result.push(token);
        previous = Some(token);
    }

    result
}

/// Shunting-yard. All operators are left associative; parentheses do not reach the output.
fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Token> = vec![];

    for token in tokens {
        match token {
            Token::Symbol(_) => output.push(token),
            Token::Open => operators.push(token),
            Token::Close => loop {
                match operators.pop() {
                    Some(Token::Open) => break,
                    Some(op) => output.push(op),
                    None => return Err(invalid("unmatched `)`")),
                }
            },
            _ => {
                while let Some(&top) = operators.last() {
                    if top == Token::Open || top.precedence() < token.precedence() {
                        break;
                    }
                    output.push(top);
                    operators.pop();
                }
                operators.push(token);
            }
        }
    }

    while let Some(op) = operators.pop() {
        if op == Token::Open {
            return Err(invalid("unmatched `(`"));
        }
        output.push(op);
    }

    Ok(output)
}

/// A partially built automaton with its designated entry and exit.
///
/// The exit is the only final state of the fragment.
#[derive(Debug)]
struct Fragment {
    nfa: Automaton,
    start: StateId,
    end: StateId,
}

/// Hands out state names that are unique across every fragment of one compilation,
/// so merging fragments never clashes.
#[derive(Debug, Default)]
struct Thompson {
    next: usize,
}

impl Thompson {
    fn fresh(&mut self) -> String {
        let name = format!("s{}", self.next);
        self.next += 1;
        name
    }

    fn skeleton(&mut self) -> Fragment {
        let mut nfa = Automaton::new(Kind::Nfa);
        let start = nfa.push_state(self.fresh(), false);
        let end = nfa.push_state(self.fresh(), true);
        Fragment { nfa, start, end }
    }

    // >(start) -symbol-> ((end))
    fn literal(&mut self, symbol: char) -> Result<Fragment> {
        let mut fragment = self.skeleton();
        fragment
            .nfa
            .connect(fragment.start, Some(symbol), fragment.end)?;
        Ok(fragment)
    }

    // >[a] -ε-> [b]
    fn concatenate(&mut self, a: Fragment, b: Fragment) -> Result<Fragment> {
        let Fragment { mut nfa, start, end } = a;

        let offset = nfa.absorb(b.nfa)?;
        let (b_start, b_end) = (b.start.add(offset), b.end.add(offset));

        nfa.connect(end, None, b_start)?;
        nfa.set_final(end, false);

        Ok(Fragment {
            nfa,
            start,
            end: b_end,
        })
    }

    //    /–>––[a]––\
    // >(s)          ((e))
    //    \–>––[b]––/
    fn union(&mut self, a: Fragment, b: Fragment) -> Result<Fragment> {
        let Fragment { mut nfa, start, end } = self.skeleton();

        for operand in vec![a, b] {
            let offset = nfa.absorb(operand.nfa)?;
            let (op_start, op_end) = (operand.start.add(offset), operand.end.add(offset));

            nfa.connect(start, None, op_start)?;
            nfa.connect(op_end, None, end)?;
            nfa.set_final(op_end, false);
        }

        Ok(Fragment { nfa, start, end })
    }

    //    /–>––––––––––––––––>\
    // >(s) -> [a] ––––––––> ((e))
    //          \<-------/
    fn star(&mut self, a: Fragment) -> Result<Fragment> {
        let Fragment { mut nfa, start, end } = self.skeleton();

        let offset = nfa.absorb(a.nfa)?;
        let (op_start, op_end) = (a.start.add(offset), a.end.add(offset));

        nfa.connect(start, None, op_start)?;
        nfa.connect(start, None, end)?;
        nfa.connect(op_end, None, op_start)?;
        nfa.connect(op_end, None, end)?;
        nfa.set_final(op_end, false);

        Ok(Fragment { nfa, start, end })
    }
}

fn operand(stack: &mut Vec<Fragment>, operator: &str) -> Result<Fragment> {
    stack
        .pop()
        .ok_or_else(|| invalid(format!("`{}` is missing an operand", operator)))
}

/// Compiles a regular expression over alphanumeric symbols into an NFA using
/// Thompson's construction.
///
/// Supported syntax is `|`, `*`, parentheses and implicit concatenation. The
/// result has exactly one initial and one final state.
pub fn compile_regex(regex: &str) -> Result<Automaton> {
    if regex.is_empty() {
        return Err(invalid("empty expression"));
    }

    let postfix = to_postfix(insert_concatenation(tokenize(regex)?))?;

    let mut thompson = Thompson::default();
    let mut stack: Vec<Fragment> = vec![];

    for token in postfix {
        let fragment = match token {
            Token::Symbol(c) => thompson.literal(c)?,
            Token::Star => {
                let a = operand(&mut stack, "*")?;
                thompson.star(a)?
            }
            Token::Concat => {
                let b = operand(&mut stack, "concatenation")?;
                let a = operand(&mut stack, "concatenation")?;
                thompson.concatenate(a, b)?
            }
            Token::Union => {
                let b = operand(&mut stack, "|")?;
                let a = operand(&mut stack, "|")?;
                thompson.union(a, b)?
            }
            Token::Open | Token::Close => return Err(invalid("unbalanced parentheses")),
        };
        stack.push(fragment);
    }

    let Fragment { mut nfa, start, end } = match (stack.pop(), stack.is_empty()) {
        (Some(fragment), true) => fragment,
        (None, _) => return Err(invalid("no operands")),
        (Some(_), false) => return Err(invalid("leftover operands")),
    };

    for id in nfa.state_ids().collect::<Vec<_>>() {
        nfa.set_final(id, false);
    }
    nfa.set_final(end, true);
    nfa.set_initial_id(start);

    debug!(
        "compiled `{}` into an NFA with {} states",
        regex,
        nfa.len()
    );
    Ok(nfa)
}

impl Automaton {
    pub fn regex(regex: &str) -> Result<Automaton> {
        compile_regex(regex)
    }
}
