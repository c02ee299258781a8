use std::collections::HashMap;
use std::sync::Arc;

use crate::ast::*;
use crate::schema::{Schema, SCHEMA_META_FIELD, TYPE_META_FIELD};
use crate::types::{FieldDescriptor, GraphQLType};
use crate::ResolutionError;

/// OperationVisitor
///
/// Tracks where in the schema the walk currently is. Every stack is pushed
/// before the matching enter hook runs and popped after the leave hook, so
/// hooks always observe the type of the node they are given.
pub struct OperationVisitorContext<'a> {
    pub schema: &'a Schema,
    pub operation: &'a Document,
    pub known_fragments: HashMap<&'a str, &'a FragmentDefinition>,

    type_stack: Vec<Option<Arc<GraphQLType>>>,
    input_type_stack: Vec<Option<Arc<GraphQLType>>>,
    field_stack: Vec<Option<Arc<FieldDescriptor>>>,
    directive: Option<&'a Directive>,
    selection_depth: usize,
}

impl<'a> OperationVisitorContext<'a> {
    pub fn new(operation: &'a Document, schema: &'a Schema) -> Self {
        OperationVisitorContext {
            schema,
            operation,
            known_fragments: HashMap::from_iter(
                operation
                    .fragments()
                    .map(|fragment| (fragment.name.as_str(), fragment)),
            ),
            type_stack: vec![],
            input_type_stack: vec![],
            field_stack: vec![],
            directive: None,
            selection_depth: 0,
        }
    }

    pub fn with_type<R, Func>(&mut self, t: Option<Arc<GraphQLType>>, func: Func) -> R
    where
        Func: FnOnce(&mut OperationVisitorContext<'a>) -> R,
    {
        self.type_stack.push(t);
        let result = func(self);
        self.type_stack.pop();
        result
    }

    /// Pushes a field and its type together.
    pub fn with_field<R, Func>(
        &mut self,
        f: Option<Arc<FieldDescriptor>>,
        t: Option<Arc<GraphQLType>>,
        func: Func,
    ) -> R
    where
        Func: FnOnce(&mut OperationVisitorContext<'a>) -> R,
    {
        self.field_stack.push(f);
        let result = self.with_type(t, func);
        self.field_stack.pop();
        result
    }

    pub fn with_input_type<R, Func>(&mut self, t: Option<Arc<GraphQLType>>, func: Func) -> R
    where
        Func: FnOnce(&mut OperationVisitorContext<'a>) -> R,
    {
        self.input_type_stack.push(t);
        let result = func(self);
        self.input_type_stack.pop();
        result
    }

    pub fn with_directive<R, Func>(&mut self, directive: &'a Directive, func: Func) -> R
    where
        Func: FnOnce(&mut OperationVisitorContext<'a>) -> R,
    {
        let previous = self.directive.replace(directive);
        let result = func(self);
        self.directive = previous;
        result
    }

    pub fn current_type(&self) -> Option<&Arc<GraphQLType>> {
        self.type_stack.last().and_then(Option::as_ref)
    }

    /// The type enclosing the current one. Absent at the root of a definition.
    pub fn parent_type(&self) -> Option<&Arc<GraphQLType>> {
        match self.type_stack.len() {
            0 | 1 => None,
            len => self.type_stack[len - 2].as_ref(),
        }
    }

    pub fn current_input_type(&self) -> Option<&Arc<GraphQLType>> {
        self.input_type_stack.last().and_then(Option::as_ref)
    }

    pub fn current_field(&self) -> Option<&Arc<FieldDescriptor>> {
        self.field_stack.last().and_then(Option::as_ref)
    }

    pub fn current_directive(&self) -> Option<&'a Directive> {
        self.directive
    }

    pub fn type_depth(&self) -> usize {
        self.type_stack.len()
    }

    pub fn field_depth(&self) -> usize {
        self.field_stack.len()
    }

    pub fn underlying_type<'t>(&self, t: &'t GraphQLType) -> &'t GraphQLType {
        t.named_type()
    }

    /// Looks a field up by name. The query root also answers `__schema` and
    /// `__type`; wrappers delegate to the type they wrap.
    pub fn get_field(&self, t: &GraphQLType, name: &str) -> Option<Arc<FieldDescriptor>> {
        if self.schema.is_query_root(t) {
            match name {
                "__schema" => return Some(SCHEMA_META_FIELD.clone()),
                "__type" => return Some(TYPE_META_FIELD.clone()),
                _ => {}
            }
        }

        match t {
            GraphQLType::Object(object) => object.get_field(name).cloned(),
            GraphQLType::InputObject(input_object) => input_object
                .field(name)
                .map(|field| Arc::new(FieldDescriptor::from_input_field(field))),
            GraphQLType::List(list) => self.get_field(list.of_type(), name),
            GraphQLType::NonNull(non_null) => self.get_field(non_null.of_type(), name),
            GraphQLType::Scalar(_) | GraphQLType::Enum(_) => None,
        }
    }

    /// Type of an argument of the directive being visited or, outside of a
    /// directive, of the current field.
    pub fn last_argument_type(&self, argument: &Argument) -> Option<Arc<GraphQLType>> {
        let definition = match self.directive {
            Some(directive) => self
                .schema
                .resolve_directive(&directive.name)?
                .get_argument(&argument.name)?,
            None => self.current_field()?.get_argument(&argument.name)?,
        };

        self.schema.resolve_input_type(&definition.value_type)
    }

    fn field_type(&self, field: &FieldDescriptor) -> Option<Arc<GraphQLType>> {
        self.schema
            .resolve_output_type(&field.field_type)
            .or_else(|| self.schema.resolve_input_type(&field.field_type))
    }
}

pub fn visit_document<'a, Visitor, UserContext>(
    visitor: &mut Visitor,
    document: &'a Document,
    context: &mut OperationVisitorContext<'a>,
    user_context: &mut UserContext,
) -> Result<(), ResolutionError>
where
    Visitor: OperationVisitor<'a, UserContext>,
{
    visitor.enter_document(context, user_context, document);
    visit_definitions(visitor, &document.definitions, context, user_context)?;
    visitor.leave_document(context, user_context, document);

    Ok(())
}

fn visit_definitions<'a, Visitor, UserContext>(
    visitor: &mut Visitor,
    definitions: &'a [Definition],
    context: &mut OperationVisitorContext<'a>,
    user_context: &mut UserContext,
) -> Result<(), ResolutionError>
where
    Visitor: OperationVisitor<'a, UserContext>,
{
    for definition in definitions {
        match definition {
            Definition::Fragment(fragment) => {
                let schema_type = context
                    .schema
                    .resolve_output_type_by_name(&fragment.type_condition);

                context.with_type(schema_type, |context| {
                    visit_fragment_definition(visitor, fragment, context, user_context)
                })?;
            }
            Definition::Operation(operation) => {
                let schema_type = context
                    .schema
                    .root_type(operation.operation_type)
                    .ok_or_else(|| {
                        ResolutionError::UnsupportedOperationKind(
                            operation.operation_type.to_string(),
                        )
                    })?;

                context.with_type(Some(schema_type), |context| {
                    visit_operation_definition(visitor, operation, context, user_context)
                })?;
            }
        }
    }

    Ok(())
}

fn visit_directives<'a, Visitor, UserContext>(
    visitor: &mut Visitor,
    directives: &'a [Directive],
    context: &mut OperationVisitorContext<'a>,
    user_context: &mut UserContext,
) where
    Visitor: OperationVisitor<'a, UserContext>,
{
    for directive in directives {
        context.with_directive(directive, |context| {
            visitor.enter_directive(context, user_context, directive);
            visit_arguments(visitor, &directive.arguments, context, user_context);
            visitor.leave_directive(context, user_context, directive);
        });
    }
}

fn visit_arguments<'a, Visitor, UserContext>(
    visitor: &mut Visitor,
    arguments: &'a [Argument],
    context: &mut OperationVisitorContext<'a>,
    user_context: &mut UserContext,
) where
    Visitor: OperationVisitor<'a, UserContext>,
{
    for argument in arguments {
        let arg_type = context.last_argument_type(argument);

        context.with_input_type(arg_type, |context| {
            visitor.enter_argument(context, user_context, argument);
            visit_input_value(visitor, &argument.value, context, user_context);
            visitor.leave_argument(context, user_context, argument);
        })
    }
}

fn visit_input_value<'a, Visitor, UserContext>(
    visitor: &mut Visitor,
    input_value: &'a Value,
    context: &mut OperationVisitorContext<'a>,
    user_context: &mut UserContext,
) where
    Visitor: OperationVisitor<'a, UserContext>,
{
    match input_value {
        Value::Boolean(_) | Value::Float(_) | Value::Int(_) | Value::String(_) => {
            visitor.enter_scalar_value(context, user_context, input_value);
            visitor.leave_scalar_value(context, user_context, input_value);
        }
        Value::Null => {
            visitor.enter_null_value(context, user_context, ());
            visitor.leave_null_value(context, user_context, ());
        }
        Value::Enum(v) => {
            visitor.enter_enum_value(context, user_context, v);
            visitor.leave_enum_value(context, user_context, v);
        }
        Value::List(v) => {
            visitor.enter_list_value(context, user_context, v);

            let input_type = context.current_input_type().and_then(|t| match t.as_ref() {
                GraphQLType::List(list) => Some(list.of_type().clone()),
                GraphQLType::NonNull(non_null) => match non_null.of_type().as_ref() {
                    GraphQLType::List(list) => Some(list.of_type().clone()),
                    _ => None,
                },
                _ => None,
            });

            context.with_input_type(input_type, |context| {
                for item in v {
                    visit_input_value(visitor, item, context, user_context)
                }
            });

            visitor.leave_list_value(context, user_context, v);
        }
        Value::Object(v) => {
            visitor.enter_object_value(context, user_context, v);

            for object_field in v {
                let input_type = context
                    .current_input_type()
                    .map(|t| t.named_type())
                    .and_then(|t| match t {
                        GraphQLType::InputObject(input_object) => input_object.field(&object_field.0),
                        _ => None,
                    })
                    .and_then(|field| context.schema.resolve_input_type(field.value_type()));

                context.with_input_type(input_type, |context| {
                    visitor.enter_object_field(context, user_context, object_field);
                    visit_input_value(visitor, &object_field.1, context, user_context);
                    visitor.leave_object_field(context, user_context, object_field);
                });
            }

            visitor.leave_object_value(context, user_context, v);
        }
        Value::Variable(v) => {
            visitor.enter_variable_value(context, user_context, v);
            visitor.leave_variable_value(context, user_context, v);
        }
    }
}

fn visit_variable_definitions<'a, Visitor, UserContext>(
    visitor: &mut Visitor,
    variables: &'a [VariableDefinition],
    context: &mut OperationVisitorContext<'a>,
    user_context: &mut UserContext,
) where
    Visitor: OperationVisitor<'a, UserContext>,
{
    for variable in variables {
        let input_type = context.schema.resolve_input_type(&variable.var_type);

        context.with_input_type(input_type, |context| {
            visitor.enter_variable_definition(context, user_context, variable);

            if let Some(default_value) = &variable.default_value {
                visit_input_value(visitor, default_value, context, user_context);
            }

            visitor.leave_variable_definition(context, user_context, variable);
        })
    }
}

fn visit_selection<'a, Visitor, UserContext>(
    visitor: &mut Visitor,
    selection: &'a Selection,
    context: &mut OperationVisitorContext<'a>,
    user_context: &mut UserContext,
) -> Result<(), ResolutionError>
where
    Visitor: OperationVisitor<'a, UserContext>,
{
    match selection {
        Selection::Field(field) => {
            let field_def = context
                .current_type()
                .and_then(|t| context.get_field(t, &field.name));
            let field_type = field_def.as_deref().and_then(|f| context.field_type(f));

            context.with_field(field_def, field_type, |context| {
                visitor.enter_field(context, user_context, field);
                visit_arguments(visitor, &field.arguments, context, user_context);
                visit_directives(visitor, &field.directives, context, user_context);
                if let Some(selection_set) = &field.selection_set {
                    visit_selection_set(visitor, selection_set, context, user_context)?;
                }
                visitor.leave_field(context, user_context, field);

                Ok(())
            })
        }
        Selection::FragmentSpread(fragment_spread) => {
            visitor.enter_fragment_spread(context, user_context, fragment_spread);
            visit_directives(visitor, &fragment_spread.directives, context, user_context);
            visitor.leave_fragment_spread(context, user_context, fragment_spread);

            Ok(())
        }
        Selection::InlineFragment(inline_fragment) => {
            let fragment_type = match &inline_fragment.type_condition {
                Some(type_condition) => context.schema.resolve_output_type_by_name(type_condition),
                None => context.current_type().cloned(),
            };

            context.with_type(fragment_type, |context| {
                visitor.enter_inline_fragment(context, user_context, inline_fragment);
                visit_directives(visitor, &inline_fragment.directives, context, user_context);
                visit_selection_set(
                    visitor,
                    &inline_fragment.selection_set,
                    context,
                    user_context,
                )?;
                visitor.leave_inline_fragment(context, user_context, inline_fragment);

                Ok(())
            })
        }
    }
}

fn visit_selection_set<'a, Visitor, UserContext>(
    visitor: &mut Visitor,
    selection_set: &'a SelectionSet,
    context: &mut OperationVisitorContext<'a>,
    user_context: &mut UserContext,
) -> Result<(), ResolutionError>
where
    Visitor: OperationVisitor<'a, UserContext>,
{
    let max_depth = context.schema.limits().max_depth;
    if context.selection_depth >= max_depth {
        return Err(ResolutionError::DepthLimitExceeded(max_depth));
    }

    context.selection_depth += 1;
    visitor.enter_selection_set(context, user_context, selection_set);

    let result = selection_set
        .items
        .iter()
        .try_for_each(|selection| visit_selection(visitor, selection, context, user_context));

    if result.is_ok() {
        visitor.leave_selection_set(context, user_context, selection_set);
    }
    context.selection_depth -= 1;

    result
}

fn visit_fragment_definition<'a, Visitor, UserContext>(
    visitor: &mut Visitor,
    fragment: &'a FragmentDefinition,
    context: &mut OperationVisitorContext<'a>,
    user_context: &mut UserContext,
) -> Result<(), ResolutionError>
where
    Visitor: OperationVisitor<'a, UserContext>,
{
    visitor.enter_fragment_definition(context, user_context, fragment);
    visit_directives(visitor, &fragment.directives, context, user_context);
    visit_selection_set(visitor, &fragment.selection_set, context, user_context)?;
    visitor.leave_fragment_definition(context, user_context, fragment);

    Ok(())
}

fn visit_operation_definition<'a, Visitor, UserContext>(
    visitor: &mut Visitor,
    operation: &'a OperationDefinition,
    context: &mut OperationVisitorContext<'a>,
    user_context: &mut UserContext,
) -> Result<(), ResolutionError>
where
    Visitor: OperationVisitor<'a, UserContext>,
{
    visitor.enter_operation_definition(context, user_context, operation);
    visit_directives(visitor, &operation.directives, context, user_context);
    visit_variable_definitions(
        visitor,
        &operation.variable_definitions,
        context,
        user_context,
    );
    visit_selection_set(visitor, &operation.selection_set, context, user_context)?;
    visitor.leave_operation_definition(context, user_context, operation);

    Ok(())
}

// Trait
pub trait OperationVisitor<'a, UserContext = ()> {
    fn enter_document(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a Document,
    ) {
    }
    fn leave_document(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a Document,
    ) {
    }

    fn enter_operation_definition(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a OperationDefinition,
    ) {
    }
    fn leave_operation_definition(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a OperationDefinition,
    ) {
    }

    fn enter_fragment_definition(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a FragmentDefinition,
    ) {
    }
    fn leave_fragment_definition(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a FragmentDefinition,
    ) {
    }

    fn enter_variable_definition(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a VariableDefinition,
    ) {
    }
    fn leave_variable_definition(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a VariableDefinition,
    ) {
    }

    fn enter_directive(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a Directive,
    ) {
    }
    fn leave_directive(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a Directive,
    ) {
    }

    fn enter_argument(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a Argument,
    ) {
    }
    fn leave_argument(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a Argument,
    ) {
    }

    fn enter_selection_set(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a SelectionSet,
    ) {
    }
    fn leave_selection_set(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a SelectionSet,
    ) {
    }

    fn enter_field(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a Field,
    ) {
    }
    fn leave_field(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a Field,
    ) {
    }

    fn enter_fragment_spread(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a FragmentSpread,
    ) {
    }
    fn leave_fragment_spread(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a FragmentSpread,
    ) {
    }

    fn enter_inline_fragment(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a InlineFragment,
    ) {
    }
    fn leave_inline_fragment(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a InlineFragment,
    ) {
    }

    fn enter_null_value(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: (),
    ) {
    }
    fn leave_null_value(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: (),
    ) {
    }

    fn enter_scalar_value(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a Value,
    ) {
    }
    fn leave_scalar_value(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a Value,
    ) {
    }

    fn enter_enum_value(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a String,
    ) {
    }
    fn leave_enum_value(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a String,
    ) {
    }

    fn enter_variable_value(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a String,
    ) {
    }
    fn leave_variable_value(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a String,
    ) {
    }

    fn enter_list_value(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a [Value],
    ) {
    }
    fn leave_list_value(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a [Value],
    ) {
    }

    fn enter_object_value(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a [(String, Value)],
    ) {
    }
    fn leave_object_value(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a [(String, Value)],
    ) {
    }

    fn enter_object_field(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a (String, Value),
    ) {
    }
    fn leave_object_field(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a (String, Value),
    ) {
    }
}

#[cfg(test)]
use rand::rngs::StdRng;
#[cfg(test)]
use rand::{Rng, SeedableRng};

#[cfg(test)]
static WALK_SCHEMA: &str = "
    type Query { dog: Dog, name: String, dogs(first: Int): [Dog!]! }
    type Dog { name: String, owner: Human, friends: [Dog] }
    type Human { name: String, pets: [Dog] }
";

#[cfg(test)]
#[derive(Default)]
struct StackRecorder {
    depths: Vec<(usize, usize)>,
    selection_set_depths: Vec<usize>,
    fields: usize,
    root_types: Vec<String>,
}

#[cfg(test)]
impl<'a> OperationVisitor<'a> for StackRecorder {
    fn enter_operation_definition(
        &mut self,
        context: &mut OperationVisitorContext<'a>,
        _: &mut (),
        _: &'a OperationDefinition,
    ) {
        let root = context.current_type().map(|t| t.to_string());
        self.root_types.push(root.unwrap_or_default());
    }

    fn enter_selection_set(
        &mut self,
        context: &mut OperationVisitorContext<'a>,
        _: &mut (),
        _: &'a SelectionSet,
    ) {
        self.selection_set_depths.push(context.type_depth());
    }

    fn leave_selection_set(
        &mut self,
        context: &mut OperationVisitorContext<'a>,
        _: &mut (),
        _: &'a SelectionSet,
    ) {
        assert_eq!(self.selection_set_depths.pop(), Some(context.type_depth()));
    }

    fn enter_field(
        &mut self,
        context: &mut OperationVisitorContext<'a>,
        _: &mut (),
        _: &'a Field,
    ) {
        let enclosing = self.selection_set_depths.last().copied().unwrap_or_default();
        assert_eq!(context.type_depth(), enclosing + 1);

        self.fields += 1;
        self.depths
            .push((context.type_depth(), context.field_depth()));
    }

    fn leave_field(
        &mut self,
        context: &mut OperationVisitorContext<'a>,
        _: &mut (),
        _: &'a Field,
    ) {
        assert_eq!(
            self.depths.pop(),
            Some((context.type_depth(), context.field_depth()))
        );
    }
}

#[cfg(test)]
fn random_selection_set(rng: &mut StdRng, depth: usize) -> SelectionSet {
    const NAMES: [&str; 7] = ["dog", "name", "owner", "friends", "pets", "dogs", "unknown"];

    let items = (0..rng.gen_range(1..4))
        .map(|_| match rng.gen_range(0..5) {
            0 if depth < 6 => Selection::InlineFragment(InlineFragment {
                position: Pos::default(),
                type_condition: match rng.gen_bool(0.5) {
                    true => Some("Dog".to_string()),
                    false => None,
                },
                directives: vec![],
                selection_set: random_selection_set(rng, depth + 1),
            }),
            _ => Selection::Field(Field {
                position: Pos::default(),
                alias: None,
                name: NAMES[rng.gen_range(0..NAMES.len())].to_string(),
                arguments: vec![],
                directives: vec![],
                selection_set: match depth < 6 && rng.gen_bool(0.6) {
                    true => Some(random_selection_set(rng, depth + 1)),
                    false => None,
                },
            }),
        })
        .collect();

    SelectionSet {
        position: Pos::default(),
        items,
    }
}

#[test]
fn stacks_are_balanced_for_random_documents() {
    let schema = Schema::from_sdl(WALK_SCHEMA).expect("valid schema");
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let document = Document {
            definitions: vec![Definition::Operation(OperationDefinition {
                position: Pos::default(),
                operation_type: OperationType::Query,
                name: None,
                variable_definitions: vec![],
                directives: vec![],
                selection_set: random_selection_set(&mut rng, 0),
            })],
        };

        let mut context = OperationVisitorContext::new(&document, &schema);
        let mut recorder = StackRecorder::default();

        visit_document(&mut recorder, &document, &mut context, &mut ())
            .expect("walk failed");

        assert!(recorder.fields > 0);
        assert!(recorder.depths.is_empty());
        assert!(recorder.selection_set_depths.is_empty());
        assert_eq!(context.type_depth(), 0);
        assert_eq!(context.field_depth(), 0);
        assert!(context.current_directive().is_none());
    }
}

#[test]
fn operations_start_at_their_root_type() {
    let schema = Schema::from_sdl(
        "type Query { a: Int } type Mutation { b: Int } type Subscription { c: Int }",
    )
    .expect("valid schema");
    let document = parse_query("{ a } mutation { b } subscription { c }").expect("valid query");

    let mut context = OperationVisitorContext::new(&document, &schema);
    let mut recorder = StackRecorder::default();
    visit_document(&mut recorder, &document, &mut context, &mut ()).expect("walk failed");

    assert_eq!(recorder.root_types, vec!["Query", "Mutation", "Subscription"]);
}

#[test]
fn missing_root_types_are_unsupported() {
    let schema = Schema::from_sdl(WALK_SCHEMA).expect("valid schema");
    let document = parse_query("mutation { name }").expect("valid query");

    let mut context = OperationVisitorContext::new(&document, &schema);
    let result = visit_document(&mut StackRecorder::default(), &document, &mut context, &mut ());

    assert_eq!(
        result,
        Err(ResolutionError::UnsupportedOperationKind("mutation".to_string()))
    );
    assert_eq!(context.type_depth(), 0);
}

#[cfg(test)]
#[derive(Default)]
struct TypeRecorder {
    entries: Vec<(String, Option<String>, Option<String>, Option<String>)>,
    arguments: Vec<(String, Option<String>)>,
    directive_arguments: Vec<(String, Option<String>)>,
}

#[cfg(test)]
impl<'a> OperationVisitor<'a> for TypeRecorder {
    fn enter_field(
        &mut self,
        context: &mut OperationVisitorContext<'a>,
        _: &mut (),
        field: &'a Field,
    ) {
        self.entries.push((
            field.name.clone(),
            context.current_type().map(|t| t.to_string()),
            context.parent_type().map(|t| t.to_string()),
            context.current_field().map(|f| f.name.clone()),
        ));
    }

    fn enter_argument(
        &mut self,
        context: &mut OperationVisitorContext<'a>,
        _: &mut (),
        argument: &'a Argument,
    ) {
        let entry = (
            argument.name.clone(),
            context.current_input_type().map(|t| t.to_string()),
        );
        match context.current_directive() {
            Some(_) => self.directive_arguments.push(entry),
            None => self.arguments.push(entry),
        }
    }
}

#[test]
fn hooks_observe_field_and_argument_types() {
    let schema = Schema::from_sdl(WALK_SCHEMA).expect("valid schema");
    let document = parse_query(
        "{
          dogs(first: 2) { name @include(if: true) owner { pets { name } } }
          __schema { types { name } }
          bogus
        }",
    )
    .expect("valid query");

    let mut context = OperationVisitorContext::new(&document, &schema);
    let mut recorder = TypeRecorder::default();
    visit_document(&mut recorder, &document, &mut context, &mut ()).expect("walk failed");

    let entry = |name: &str| {
        recorder
            .entries
            .iter()
            .find(|(field, ..)| field == name)
            .cloned()
            .expect("field was visited")
    };
    let some = |s: &str| Some(s.to_string());

    assert_eq!(
        entry("dogs"),
        ("dogs".to_string(), some("[Dog!]!"), some("Query"), some("dogs"))
    );
    assert_eq!(
        entry("owner"),
        ("owner".to_string(), some("Human"), some("[Dog!]!"), some("owner"))
    );
    assert_eq!(
        entry("pets"),
        ("pets".to_string(), some("[Dog]"), some("Human"), some("pets"))
    );
    assert_eq!(entry("__schema").3, some("__schema"));
    assert_eq!(entry("bogus"), ("bogus".to_string(), None, some("Query"), None));
    assert_eq!(entry("types").2, None);

    assert_eq!(recorder.arguments, vec![("first".to_string(), some("Int"))]);
    assert_eq!(
        recorder.directive_arguments,
        vec![("if".to_string(), some("Boolean!"))]
    );
}

#[test]
fn deep_selections_stop_the_walk() {
    let mut builder = Schema::builder();
    builder
        .add_type(crate::types::ObjectType::new("Query").field(
            crate::types::FieldDescriptor::new("me", Type::named("Query")),
        ))
        .expect("valid type");
    builder.set_limits(crate::schema::Limits { max_depth: 3 });
    let schema = builder.build().expect("valid schema");

    let shallow = parse_query("{ me { me { me } } }").expect("valid query");
    let mut context = OperationVisitorContext::new(&shallow, &schema);
    assert_eq!(
        visit_document(&mut StackRecorder::default(), &shallow, &mut context, &mut ()),
        Ok(())
    );

    let deep = parse_query("{ me { me { me { me } } } }").expect("valid query");
    let mut context = OperationVisitorContext::new(&deep, &schema);
    assert_eq!(
        visit_document(&mut StackRecorder::default(), &deep, &mut context, &mut ()),
        Err(ResolutionError::DepthLimitExceeded(3))
    );
    assert_eq!(context.type_depth(), 0);
}
