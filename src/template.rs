//! Reply sentences with `{name}` placeholders.
//!
//! A backslash escapes the next character, so `\{` renders a literal brace.
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    body: Vec<TemplateSection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TemplateSection {
    Echo(String),
    Var(String),
}

/// A set of interchangeable sentences, one of which is picked per reply.
#[derive(Debug, Clone)]
pub struct Templates(Vec<Template>);

#[derive(Debug, Default)]
pub struct Vars(Vec<(&'static str, String)>);

#[derive(Debug, PartialEq, Eq)]
pub enum TemplateError {
    Unclosed(String),
    EmptyVariable,
    MissingVariable(String),
    NoTemplates,
}

impl Template {
    pub fn parse(input: &str) -> Result<Self, TemplateError> {
        let mut body = Vec::new();
        let mut current = String::new();
        let mut in_var = false;
        let mut escape = false;

        for chr in input.chars() {
            if escape {
                current.push(chr);
                escape = false;
                continue;
            }
            match chr {
                '\\' => escape = true,
                '{' if !in_var => {
                    if !current.is_empty() {
                        body.push(TemplateSection::Echo(std::mem::take(&mut current)));
                    }
                    in_var = true;
                }
                '}' if in_var => {
                    let name = std::mem::take(&mut current);
                    if name.trim().is_empty() {
                        return Err(TemplateError::EmptyVariable);
                    }
                    body.push(TemplateSection::Var(String::from(name.trim())));
                    in_var = false;
                }
                chr => current.push(chr),
            }
        }

        if in_var {
            return Err(TemplateError::Unclosed(current));
        }
        if escape {
            current.push('\\');
        }
        if !current.is_empty() {
            body.push(TemplateSection::Echo(current));
        }
        Ok(Self { body })
    }

    pub fn render(&self, vars: &Vars) -> Result<String, TemplateError> {
        let mut output = String::new();
        for section in &self.body {
            match section {
                TemplateSection::Echo(text) => output.push_str(text),
                TemplateSection::Var(name) => output.push_str(
                    vars.get(name)
                        .ok_or_else(|| TemplateError::MissingVariable(name.clone()))?,
                ),
            }
        }
        Ok(output)
    }
}

impl Templates {
    pub fn parse(inputs: &[&str]) -> Result<Self, TemplateError> {
        if inputs.is_empty() {
            return Err(TemplateError::NoTemplates);
        }
        inputs
            .iter()
            .map(|input| Template::parse(input))
            .collect::<Result<_, _>>()
            .map(Templates)
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &Template {
        // `parse` never builds an empty set
        self.0.choose(rng).unwrap_or(&self.0[0])
    }

    pub fn render<R: Rng + ?Sized>(&self, rng: &mut R, vars: &Vars) -> Result<String, TemplateError> {
        self.choose(rng).render(vars)
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.0.iter()
    }
}

impl Vars {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl ToString) -> Self {
        self.0.push((name, value.to_string()));
        self
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::Unclosed(name) => {
                f.write_fmt(format_args!("Unclosed variable {{{name}"))
            }
            TemplateError::EmptyVariable => f.write_str("Empty variable name {}."),
            TemplateError::MissingVariable(name) => {
                f.write_fmt(format_args!("No value for variable {name:?}."))
            }
            TemplateError::NoTemplates => f.write_str("A template set needs at least one sentence."),
        }
    }
}
impl std::error::Error for TemplateError {}
