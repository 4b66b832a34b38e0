mod function;
mod message;
mod tool;
mod traits;
mod usage;

pub use function::{FunctionBuilder, ParamBuilder};
pub use message::{ChatMessage, ChatMessageBuilder, ChatRole, MessageType};
pub use tool::{
    FunctionCall, FunctionTool, ParameterProperty, ParametersSchema, StructuredOutputFormat, Tool,
    ToolCall,
};
pub use traits::{ChatProvider, ChatResponse};
pub use usage::Usage;
