//! Tool Definition Macros
//!
//! Simplifies contract declaration by reducing builder boilerplate

/// Build a [`ToolContract`](crate::tools::ToolContract) using a declarative syntax
///
/// # Example
/// ```
/// use toolchat::tool_contract;
///
/// let contract = tool_contract! {
///     name: "get_current_weather",
///     description: "Get the current weather in a given location",
///     parameters: [
///         {
///             name: "location",
///             type: string,
///             description: "The city and state, e.g. San Francisco, CA",
///             required: true
///         },
///         {
///             name: "unit",
///             type: enum ["celsius", "fahrenheit"],
///             description: "Temperature unit",
///             required: false
///         }
///     ]
/// };
/// assert_eq!(contract.required, vec!["location"]);
/// ```
#[macro_export]
macro_rules! tool_contract {
    (
        name: $name:expr,
        description: $description:expr,
        parameters: [
            $(
                {
                    name: $param_name:expr,
                    type: $param_type:tt $([ $($value:expr),* $(,)? ])?,
                    description: $param_desc:expr,
                    required: $param_required:expr
                }
            ),* $(,)?
        ]
    ) => {{
        let contract = $crate::tools::ToolContract::new($name, $description);
        $(
            let contract = contract.param(
                $param_name,
                $crate::tools::ParameterSchema::new(
                    $crate::__tool_parameter_type!($param_type $([ $($value),* ])?),
                    $param_desc,
                ),
                $param_required,
            );
        )*
        contract
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __tool_parameter_type {
    (integer) => {
        $crate::tools::ParameterType::Integer
    };
    (number) => {
        $crate::tools::ParameterType::Number
    };
    (string) => {
        $crate::tools::ParameterType::String
    };
    (enum [ $($value:expr),* ]) => {
        $crate::tools::ParameterType::Enum {
            values: vec![$($value.to_string()),*],
        }
    };
}
