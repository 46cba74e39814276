use crate::error::AssignmentError;
use std::collections::HashMap;

/// Layout variable map
///
/// Values computed while generating a witness, keyed by the names the
/// layout's [`VariableCell`](super::VariableCell)s refer to.
#[derive(Clone, Debug, Default)]
pub struct Variables<'a, T>(HashMap<&'a str, T>);

impl<'a, T: Copy> Variables<'a, T> {
    /// Create a layout variable map
    pub fn create() -> Variables<'a, T> {
        Variables(HashMap::new())
    }

    /// Insert a variable and corresponding value into the variable map
    pub fn insert(&mut self, name: &'a str, value: T) {
        self.0.insert(name, value);
    }

    /// The value of variable `name`
    pub fn get(&self, name: &str) -> Result<T, AssignmentError> {
        self.0
            .get(name)
            .copied()
            .ok_or_else(|| AssignmentError::MissingVariable(name.to_string()))
    }
}

/// Macro to simplify mapping of layout variable
#[macro_export]
macro_rules! variable_map {
    [$( $name: expr => $value: expr ),*] => {{
        let mut vars = $crate::circuits::witness::Variables::create();
        $( vars.insert($name, $value); )*
        vars
    }}
}

/// Macro to simplify creation of layout variable map
#[macro_export]
macro_rules! variables {
    () => {
        $crate::circuits::witness::Variables::create()
    };
    ($( $variable: ident ),*) => {{
        let mut vars = $crate::circuits::witness::Variables::create();
        $( vars.insert(stringify!{$variable}, $variable); )*
        vars
    }}
}

pub use variable_map;
pub use variables;
