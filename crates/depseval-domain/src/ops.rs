//! Operator semantics for `+`, `%` and `not`.
//!
//! Errors are plain messages; the evaluator attaches file and line.

use depseval_types::{Dict, Value};

/// `left + right`: concatenation for str/list/tuple, checked addition for int.
pub fn add(left: Value, right: Value) -> Result<Value, String> {
    match (left, right) {
        (Value::String(mut a), Value::String(b)) => {
            a.push_str(&b);
            Ok(Value::String(a))
        }
        (Value::List(mut a), Value::List(b)) => {
            a.extend(b);
            Ok(Value::List(a))
        }
        (Value::Tuple(mut a), Value::Tuple(b)) => {
            a.extend(b);
            Ok(Value::Tuple(a))
        }
        (Value::Int(a), Value::Int(b)) => a
            .checked_add(b)
            .map(Value::Int)
            .ok_or_else(|| format!("integer overflow in {a} + {b}")),
        (a, b) => Err(unsupported_operands("+", &a, &b)),
    }
}

/// `left % right`: string formatting when `left` is a str, floor modulo for ints.
pub fn modulo(left: Value, right: Value) -> Result<Value, String> {
    match (&left, &right) {
        (Value::String(fmt), _) => format(fmt, &right).map(Value::String),
        (Value::Int(a), Value::Int(b)) => {
            if *b == 0 {
                return Err("integer division or modulo by zero".to_string());
            }
            // checked_rem only fails for MIN % -1, whose remainder is 0
            let r = a.checked_rem(*b).unwrap_or(0);
            Ok(Value::Int(if r != 0 && (r < 0) != (*b < 0) { r + b } else { r }))
        }
        _ => Err(unsupported_operands("%", &left, &right)),
    }
}

pub fn not(operand: &Value) -> Value {
    Value::Bool(!operand.is_truthy())
}

fn unsupported_operands(op: &str, a: &Value, b: &Value) -> String {
    format!(
        "unsupported operand type(s) for {op}: '{}' and '{}'",
        a.type_name(),
        b.type_name()
    )
}

/// `str()` of a value: the text itself for strings, the literal form otherwise.
fn str_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Default)]
struct Spec {
    left_align: bool,
    zero_pad: bool,
    width: usize,
}

impl Spec {
    fn pad(&self, text: String, numeric: bool) -> String {
        let len = text.chars().count();
        if len >= self.width {
            return text;
        }
        let fill = self.width - len;
        if self.left_align {
            return format!("{text}{}", " ".repeat(fill));
        }
        if self.zero_pad && numeric {
            return match text.strip_prefix('-') {
                Some(digits) => format!("-{}{digits}", "0".repeat(fill)),
                None => format!("{}{text}", "0".repeat(fill)),
            };
        }
        format!("{}{text}", " ".repeat(fill))
    }
}

/// printf-style formatting of `fmt` with `args`.
///
/// A tuple supplies positional arguments, a dict supplies `%(name)` lookups, anything else is
/// a single argument.
pub fn format(fmt: &str, args: &Value) -> Result<String, String> {
    let (positional, mapping): (Vec<&Value>, Option<&Dict>) = match args {
        Value::Tuple(items) => (items.iter().collect(), None),
        Value::Dict(d) => (vec![args], Some(d)),
        other => (vec![other], None),
    };
    let mut next = 0usize;
    let mut out = String::with_capacity(fmt.len());
    let mut chars = fmt.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut key = None;
        if chars.peek() == Some(&'(') {
            chars.next();
            let mut name = String::new();
            let mut depth = 1;
            loop {
                match chars.next() {
                    Some('(') => {
                        depth += 1;
                        name.push('(');
                    }
                    Some(')') => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                        name.push(')');
                    }
                    Some(ch) => name.push(ch),
                    None => return Err("incomplete format key".to_string()),
                }
            }
            key = Some(name);
        }

        let mut spec = Spec::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.left_align = true,
                '0' => spec.zero_pad = true,
                ' ' | '+' | '#' => {}
                _ => break,
            }
            chars.next();
        }
        while let Some(d) = chars.peek().and_then(|ch| ch.to_digit(10)) {
            spec.width = spec.width * 10 + d as usize;
            chars.next();
        }

        let Some(conv) = chars.next() else {
            return Err("incomplete format".to_string());
        };
        if conv == '%' && key.is_none() {
            out.push('%');
            continue;
        }

        let arg = match &key {
            Some(name) => {
                let Some(dict) = mapping else {
                    return Err("format requires a mapping".to_string());
                };
                dict.get_str(name)
                    .ok_or_else(|| format!("format key {:?} not found", name))?
            }
            None => {
                let Some(arg) = positional.get(next) else {
                    return Err("not enough arguments for format string".to_string());
                };
                next += 1;
                *arg
            }
        };

        let text = match conv {
            's' => spec.pad(str_of(arg), false),
            'r' => spec.pad(arg.to_string(), false),
            'd' | 'i' => spec.pad(integer_of(conv, arg)?.to_string(), true),
            'x' => {
                let n = integer_of(conv, arg)?;
                let hex = if n < 0 {
                    format!("-{:x}", n.unsigned_abs())
                } else {
                    format!("{n:x}")
                };
                spec.pad(hex, true)
            }
            other => {
                return Err(format!(
                    "unsupported format character {other:?} (0x{:x})",
                    other as u32
                ));
            }
        };
        out.push_str(&text);
    }

    if mapping.is_none() && next < positional.len() {
        return Err("not all arguments converted during string formatting".to_string());
    }
    Ok(out)
}

fn integer_of(conv: char, arg: &Value) -> Result<i64, String> {
    match arg {
        Value::Int(i) => Ok(*i),
        Value::Bool(b) => Ok(i64::from(*b)),
        other => Err(format!(
            "%{conv} format: a number is required, not {}",
            other.type_name()
        )),
    }
}
