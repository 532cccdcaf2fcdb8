//! In-memory triple graph over a Turtle document. Parsing is done by
//! `oxttl`; this module only flattens its terms into the small shape the
//! DCAT mapping queries (objects by subject and predicate, subjects by type).

use oxrdf::{Subject, Term as RdfTerm};
use oxttl::{TurtleParseError, TurtleParser};

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Iri(String),
    BlankNode(String),
    Literal {
        value: String,
        language: Option<String>,
        datatype: Option<String>,
    },
}

impl Term {
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Lexical form of a literal.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Term::Literal { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Literal value or IRI text, whichever applies.
    pub fn text(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Literal { value, .. } => Some(value),
            Term::BlankNode(_) => None,
        }
    }

    #[allow(unreachable_patterns)]
    fn from_subject(subject: Subject) -> Option<Self> {
        match subject {
            Subject::NamedNode(node) => Some(Term::Iri(node.into_string())),
            Subject::BlankNode(node) => Some(Term::BlankNode(node.into_string())),
            _ => None,
        }
    }

    #[allow(unreachable_patterns)]
    fn from_object(object: RdfTerm) -> Option<Self> {
        match object {
            RdfTerm::NamedNode(node) => Some(Term::Iri(node.into_string())),
            RdfTerm::BlankNode(node) => Some(Term::BlankNode(node.into_string())),
            RdfTerm::Literal(literal) => Some(Term::Literal {
                value: literal.value().to_string(),
                language: literal.language().map(str::to_string),
                datatype: Some(literal.datatype().as_str().to_string()),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

#[derive(Debug, thiserror::Error)]
#[error("turtle syntax error at line {line}: {message}")]
pub struct TurtleError {
    /// 1-based; 0 when the failure has no source position.
    pub line: usize,
    pub message: String,
}

impl From<TurtleParseError> for TurtleError {
    fn from(err: TurtleParseError) -> Self {
        let line = match &err {
            TurtleParseError::Syntax(syntax) => syntax.location().start.line as usize + 1,
            TurtleParseError::Io(_) => 0,
        };
        Self {
            line,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Graph {
    triples: Vec<Triple>,
}

impl Graph {
    /// Parse a whole document. The first syntax error aborts the parse.
    pub fn parse(text: &str) -> Result<Graph, TurtleError> {
        let mut triples = Vec::new();
        for triple in TurtleParser::new().for_reader(text.as_bytes()) {
            let triple = triple?;
            let subject = Term::from_subject(triple.subject);
            let object = Term::from_object(triple.object);
            if let (Some(subject), Some(object)) = (subject, object) {
                triples.push(Triple {
                    subject,
                    predicate: triple.predicate.into_string(),
                    object,
                });
            }
        }
        Ok(Graph { triples })
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn objects<'a>(
        &'a self,
        subject: &'a Term,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject && t.predicate == predicate)
            .map(|t| &t.object)
    }

    pub fn object<'a>(&'a self, subject: &'a Term, predicate: &'a str) -> Option<&'a Term> {
        self.objects(subject, predicate).next()
    }

    /// Subjects declared `a <class>`, in document order.
    pub fn subjects_of_type<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| t.predicate == RDF_TYPE && t.object.as_iri() == Some(class))
            .map(|t| &t.subject)
    }
}
