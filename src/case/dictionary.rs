/*!
 * Solver dictionary files.
 *
 * A small model of the keyword/value dictionary syntax used by every file in
 * the case directory, with a writer and a parser for the same subset.
 * Keys keep their quotes, so regular-expression keys such as
 * `"(U|k)Final"` survive a round trip.
 */

use std::fmt;

/// A dictionary value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Word(String),
    Number(f64),
    /// Quoted string.
    Str(String),
    Vector([f64; 3]),
    Dimensions([i32; 7]),
    /// `[0 2 -1 0 0 0 0] 1e-05`
    Dimensioned([i32; 7], Box<Value>),
    /// `uniform <value>`
    Uniform(Box<Value>),
    List(Vec<Value>),
    /// Space separated tokens, e.g. `Gauss linear corrected`.
    Tokens(Vec<Value>),
}
impl Value {
    pub fn word(word: &str) -> Self {
        Value::Word(word.to_string())
    }

    pub fn uniform_scalar(value: f64) -> Self {
        Value::Uniform(Box::new(Value::Number(value)))
    }

    pub fn uniform_vector(value: [f64; 3]) -> Self {
        Value::Uniform(Box::new(Value::Vector(value)))
    }

    pub fn switch(on: bool) -> Self {
        Value::word(if on { "yes" } else { "no" })
    }

    /// Split on whitespace into words and numbers.
    pub fn tokens(text: &str) -> Self {
        let mut tokens: Vec<Value> = text.split_whitespace()
            .map(|token| match parse_number(token) {
                Some(number) => Value::Number(number),
                None => Value::word(token),
            })
            .collect();
        if tokens.len() == 1 {
            return tokens.remove(0);
        }
        Value::Tokens(tokens)
    }

    pub fn words(words: &[&str]) -> Self {
        Value::List(words.iter().map(|word| Value::word(word)).collect())
    }

    pub fn as_word(&self) -> Option<&str> {
        match self {
            Value::Word(word) => Some(word),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }
}

fn format_number(value: f64) -> String {
    // -0 is written as 0
    let value = if value == 0.0 { 0.0 } else { value };
    let magnitude = value.abs();
    if magnitude != 0.0 && (magnitude < 1e-4 || magnitude >= 1e7) {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Word(word) => write!(f, "{}", word),
            Value::Number(number) => write!(f, "{}", format_number(*number)),
            Value::Str(text) => write!(f, "\"{}\"", text),
            Value::Vector([x, y, z]) => write!(f, "({} {} {})", format_number(*x), format_number(*y), format_number(*z)),
            Value::Dimensions(dims) => {
                let dims: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
                write!(f, "[{}]", dims.join(" "))
            },
            Value::Dimensioned(dims, value) => write!(f, "{} {}", Value::Dimensions(*dims), value),
            Value::Uniform(value) => write!(f, "uniform {}", value),
            Value::List(values) => {
                let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "({})", values.join(" "))
            },
            Value::Tokens(values) => {
                let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", values.join(" "))
            },
        }
    }
}

/// A dictionary entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Value(Value),
    Dict(Dict),
}

/// An ordered dictionary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dict {
    entries: Vec<(String, Entry)>,
}
impl Dict {
    pub fn new() -> Self {
        Dict{entries: Vec::new()}
    }

    fn put(&mut self, key: &str, entry: Entry) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = entry,
            None => self.entries.push((key.to_string(), entry)),
        }
    }

    /// Set a value, replacing any entry with the same key.
    pub fn set(&mut self, key: &str, value: Value) -> &mut Self {
        self.put(key, Entry::Value(value));
        self
    }

    /// Set a sub-dictionary, replacing any entry with the same key.
    pub fn set_dict(&mut self, key: &str, dict: Dict) -> &mut Self {
        self.put(key, Entry::Dict(dict));
        self
    }

    /// Builder form of `set`.
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.set(key, value);
        self
    }

    /// Builder form of `set_dict`.
    pub fn with_dict(mut self, key: &str, dict: Dict) -> Self {
        self.set_dict(key, dict);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, entry)| entry)
    }

    pub fn get_value(&self, key: &str) -> Option<&Value> {
        match self.get(key) {
            Some(Entry::Value(value)) => Some(value),
            _ => None,
        }
    }

    pub fn get_dict(&self, key: &str) -> Option<&Dict> {
        match self.get(key) {
            Some(Entry::Dict(dict)) => Some(dict),
            _ => None,
        }
    }

    /// Look up a `/` separated path, e.g. `boundaryField/inlet/type`.
    pub fn lookup(&self, path: &str) -> Option<&Entry> {
        let mut parts = path.split('/').filter(|part| !part.is_empty()).peekable();
        let mut dict = self;
        while let Some(part) = parts.next() {
            let entry = dict.get(part)?;
            if parts.peek().is_none() {
                return Some(entry);
            }
            match entry {
                Entry::Dict(sub) => dict = sub,
                Entry::Value(_) => return None,
            }
        }
        None
    }

    pub fn lookup_value(&self, path: &str) -> Option<&Value> {
        match self.lookup(path) {
            Some(Entry::Value(value)) => Some(value),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn write_entries(&self, out: &mut String, indent: usize) {
        let pad = "    ".repeat(indent);
        for (key, entry) in self.entries.iter() {
            match entry {
                Entry::Value(value) => {
                    out.push_str(&format!("{}{:<15} {};\n", pad, key, value));
                },
                Entry::Dict(dict) => {
                    out.push_str(&format!("{}{}\n{}{{\n", pad, key, pad));
                    dict.write_entries(out, indent + 1);
                    out.push_str(&format!("{}}}\n", pad));
                },
            }
        }
    }

    /// Dictionary text without a file header.
    pub fn to_foam_string(&self) -> String {
        let mut out = String::new();
        self.write_entries(&mut out, 0);
        out
    }
}

/// The `FoamFile` header every case file starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct FoamHeader {
    pub class: String,
    pub location: String,
    pub object: String,
}
impl FoamHeader {
    pub fn new(class: &str, location: &str, object: &str) -> Self {
        FoamHeader{class: class.to_string(), location: location.to_string(), object: object.to_string()}
    }

    fn to_dict(&self) -> Dict {
        Dict::new()
            .with("version", Value::word("2.0"))
            .with("format", Value::word("ascii"))
            .with("class", Value::Word(self.class.clone()))
            .with("location", Value::Str(self.location.clone()))
            .with("object", Value::Word(self.object.clone()))
    }

    /// Full file text: banner, header and body.
    pub fn render(&self, body: &Dict) -> String {
        let mut out = String::new();
        out.push_str("/*--------------------------------*- C++ -*----------------------------------*\\\n");
        out.push_str(&format!("  Written by cfdcase {}\n", env!("CARGO_PKG_VERSION")));
        out.push_str("\\*---------------------------------------------------------------------------*/\n");
        out.push_str(&Dict::new().with_dict("FoamFile", self.to_dict()).to_foam_string());
        out.push_str("// * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * //\n\n");
        out.push_str(&body.to_foam_string());
        out.push_str("\n// ************************************************************************* //\n");
        out
    }
}

/// Dictionary syntax error.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}
impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- Line {}: {}", self.line, self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Number(f64),
    Str(String),
    Punct(char),
}

fn parse_number(text: &str) -> Option<f64> {
    let mut chars = text.chars();
    let first = chars.next()?;
    let numeric_start = first.is_ascii_digit()
        || ((first == '-' || first == '+' || first == '.') && chars.next().map_or(false, |c| c.is_ascii_digit() || c == '.'));
    if !numeric_start {
        return None;
    }
    text.parse::<f64>().ok()
}

fn tokenize(text: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\n' {
            line += 1;
            i += 1;
        } else if c.is_whitespace() {
            i += 1;
        } else if c == '/' && chars.get(i + 1) == Some(&'/') {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
        } else if c == '/' && chars.get(i + 1) == Some(&'*') {
            i += 2;
            while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                if chars[i] == '\n' {
                    line += 1;
                }
                i += 1;
            }
            if i >= chars.len() {
                return Err(ParseError{line, message: "unterminated comment".to_string()});
            }
            i += 2;
        } else if c == '"' {
            let start_line = line;
            let mut text = String::new();
            i += 1;
            while i < chars.len() && chars[i] != '"' {
                if chars[i] == '\\' && i + 1 < chars.len() {
                    text.push(chars[i]);
                    i += 1;
                }
                if chars[i] == '\n' {
                    line += 1;
                }
                text.push(chars[i]);
                i += 1;
            }
            if i >= chars.len() {
                return Err(ParseError{line: start_line, message: "unterminated string".to_string()});
            }
            i += 1;
            tokens.push((Token::Str(text), start_line));
        } else if "{}()[];".contains(c) {
            tokens.push((Token::Punct(c), line));
            i += 1;
        } else {
            // Words may carry balanced parentheses, e.g. div(phi,U)
            let mut word = String::new();
            let mut depth = 0;
            while i < chars.len() {
                let c = chars[i];
                if c.is_whitespace() || c == ';' || c == '{' || c == '}' || c == '[' || c == ']' || c == '"' {
                    break;
                }
                if c == '(' {
                    depth += 1;
                } else if c == ')' {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                word.push(c);
                i += 1;
            }
            match parse_number(&word) {
                Some(number) => tokens.push((Token::Number(number), line)),
                None => tokens.push((Token::Word(word), line)),
            }
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}
impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn line(&self) -> usize {
        self.tokens.get(self.pos)
            .or(self.tokens.last())
            .map_or(1, |(_, line)| *line)
    }

    fn error<T>(&self, message: &str) -> Result<T, ParseError> {
        Err(ParseError{line: self.line(), message: message.to_string()})
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(token, _)| token.clone());
        self.pos += 1;
        token
    }

    fn dict(&mut self, nested: bool) -> Result<Dict, ParseError> {
        let mut dict = Dict::new();
        loop {
            let key = match self.next() {
                None if nested => return self.error("missing '}'"),
                None => return Ok(dict),
                Some(Token::Punct('}')) if nested => return Ok(dict),
                Some(Token::Punct(';')) => continue,
                Some(Token::Word(word)) => word,
                Some(Token::Str(text)) => format!("\"{}\"", text),
                Some(token) => return self.error(&format!("expected a keyword, found {:?}", token)),
            };
            if self.peek() == Some(&Token::Punct('{')) {
                self.pos += 1;
                let sub = self.dict(true)?;
                dict.set_dict(&key, sub);
                continue;
            }
            let mut values = Vec::new();
            loop {
                match self.peek() {
                    Some(Token::Punct(';')) => {
                        self.pos += 1;
                        break;
                    },
                    None => return self.error(&format!("missing ';' after '{}'", key)),
                    _ => values.push(self.value()?),
                }
            }
            let value = match values.len() {
                0 => return self.error(&format!("no value for '{}'", key)),
                1 => values.remove(0),
                2 if matches!(values[0], Value::Dimensions(_)) => {
                    let value = values.remove(1);
                    match values.remove(0) {
                        Value::Dimensions(dims) => Value::Dimensioned(dims, Box::new(value)),
                        _ => return self.error("expected dimensions"),
                    }
                },
                _ => Value::Tokens(values),
            };
            dict.set(&key, value);
        }
    }

    fn value(&mut self) -> Result<Value, ParseError> {
        match self.next() {
            Some(Token::Word(word)) if word == "uniform" => Ok(Value::Uniform(Box::new(self.value()?))),
            Some(Token::Word(word)) => Ok(Value::Word(word)),
            Some(Token::Number(number)) => Ok(Value::Number(number)),
            Some(Token::Str(text)) => Ok(Value::Str(text)),
            Some(Token::Punct('(')) => {
                let mut items = Vec::new();
                loop {
                    match self.peek() {
                        Some(Token::Punct(')')) => {
                            self.pos += 1;
                            break;
                        },
                        None => return self.error("missing ')'"),
                        _ => items.push(self.value()?),
                    }
                }
                match items.as_slice() {
                    [Value::Number(x), Value::Number(y), Value::Number(z)] => Ok(Value::Vector([*x, *y, *z])),
                    _ => Ok(Value::List(items)),
                }
            },
            Some(Token::Punct('[')) => {
                let mut dims = Vec::new();
                loop {
                    match self.next() {
                        Some(Token::Punct(']')) => break,
                        Some(Token::Number(number)) if number.fract() == 0.0 => dims.push(number as i32),
                        _ => return self.error("dimensions must be whole numbers closed by ']'"),
                    }
                }
                match <[i32; 7]>::try_from(dims.as_slice()) {
                    Ok(dims) => Ok(Value::Dimensions(dims)),
                    Err(_) => self.error(&format!("expected 7 dimension exponents, found {}", dims.len())),
                }
            },
            Some(token) => self.error(&format!("unexpected {:?}", token)),
            None => self.error("unexpected end of file"),
        }
    }
}

/// Parse dictionary text. The `FoamFile` header, if any, is kept as an entry.
pub fn parse_foam(text: &str) -> Result<Dict, ParseError> {
    let mut parser = Parser{tokens: tokenize(text)?, pos: 0};
    parser.dict(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dict {
        Dict::new()
            .with("dimensions", Value::Dimensions([0, 1, -1, 0, 0, 0, 0]))
            .with("internalField", Value::uniform_vector([1.0, 0.0, -2.5]))
            .with("nu", Value::Dimensioned([0, 2, -1, 0, 0, 0, 0], Box::new(Value::Number(1.5e-5))))
            .with("phases", Value::words(&["water", "air"]))
            .with("libs", Value::List(vec![Value::Str("libutilityFunctionObjects.so".to_string())]))
            .with_dict("divSchemes", Dict::new()
                .with("default", Value::word("none"))
                .with("div(phi,U)", Value::tokens("bounded Gauss linearUpwind grad(U)"))
                .with("div((nuEff*dev2(T(grad(U)))))", Value::tokens("Gauss linear"))
                .with("\"div\\(phi,(k|omega)\\)\"", Value::tokens("bounded Gauss limitedLinear 1")))
            .with_dict("boundaryField", Dict::new()
                .with_dict("inlet", Dict::new()
                    .with("type", Value::word("fixedValue"))
                    .with("value", Value::uniform_scalar(0.0))))
    }

    #[test]
    fn writes_foam_syntax() {
        let text = sample().to_foam_string();
        assert!(text.contains("internalField   uniform (1 0 -2.5);\n"));
        assert!(text.contains("nu              [0 2 -1 0 0 0 0] 1.5e-5;\n"));
        assert!(text.contains("boundaryField\n{\n    inlet\n    {\n        type            fixedValue;\n"));
    }

    #[test]
    fn parses_what_it_writes() {
        let dict = sample();
        let text = FoamHeader::new("volVectorField", "0", "U").render(&dict);
        let parsed = parse_foam(&text).unwrap();
        assert_eq!(parsed.lookup_value("FoamFile/object"), Some(&Value::word("U")));
        for key in dict.keys() {
            assert_eq!(parsed.get(key), dict.get(key), "{}", key);
        }
        assert_eq!(parsed.lookup_value("boundaryField/inlet/type").and_then(Value::as_word), Some("fixedValue"));
    }

    #[test]
    fn parses_hand_written_files() {
        let text = "
/* block
   comment */
solvers
{
    \"(U|k)Final\" { solver smoothSolver; relTol 0; }   // trailing
}
value uniform 2e5;
";
        let parsed = parse_foam(text).unwrap();
        assert_eq!(parsed.lookup_value("solvers/\"(U|k)Final\"/relTol"), Some(&Value::Number(0.0)));
        assert_eq!(parsed.get_value("value"), Some(&Value::uniform_scalar(2e5)));
    }

    #[test]
    fn reports_syntax_errors() {
        let error = parse_foam("a 1;\nb {\n c 2;\n").unwrap_err();
        assert!(error.message.contains("'}'"));
        assert!(parse_foam("dims [0 1];").is_err());
        assert!(parse_foam("key value").is_err());
    }
}
