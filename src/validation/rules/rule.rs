use crate::ast::OperationVisitorContext;
use crate::validation::utils::ValidationErrorContext;
use crate::ResolutionError;

pub trait ValidationRule: Send + Sync {
    fn error_code<'a>(&self) -> &'a str;

    /// Walks the operation, reporting diagnostics into `error_collector`. An
    /// `Err` means the walk itself could not complete.
    fn validate<'a>(
        &self,
        ctx: &mut OperationVisitorContext<'a>,
        error_collector: &mut ValidationErrorContext,
    ) -> Result<(), ResolutionError>;
}
