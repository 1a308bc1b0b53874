//! Transient builder: a fresh instance per call.

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::container::{Container, WeakContainer};
use crate::descriptors::{Argument, Arguments, ErasedConstructor, ParameterBinding, TypeInfo};
use crate::error::{IocError, IocResult};
use crate::lifetime::Lifetime;
use crate::registration::{AnyArc, AnyBox};
use crate::scalar::parse_named;

use super::ObjectBuilder;

pub(crate) struct TransientBuilder {
    info: Arc<TypeInfo>,
    parameters: BTreeMap<String, String>,
    properties: BTreeMap<String, String>,
    container: OnceCell<WeakContainer>,
}

impl TransientBuilder {
    pub(crate) fn new(
        info: Arc<TypeInfo>,
        parameters: BTreeMap<String, String>,
        properties: BTreeMap<String, String>,
    ) -> Self {
        Self {
            info,
            parameters,
            properties,
            container: OnceCell::new(),
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.info.type_name
    }

    pub(crate) fn connect(&self, container: WeakContainer) -> IocResult<()> {
        self.container.set(container).map_err(|_| {
            IocError::invalid_argument(format!(
                "builder for {} is already connected to a container",
                self.info.type_name
            ))
        })
    }

    fn container(&self) -> IocResult<Container> {
        let disconnected = || IocError::Disconnected {
            type_name: self.info.type_name,
        };
        self.container.get().ok_or_else(disconnected)?.upgrade().ok_or_else(disconnected)
    }

    /// Runs the full construction algorithm once.
    pub(crate) fn build_instance(&self) -> IocResult<AnyArc> {
        let container = self.container()?;
        let constructor = self.select_constructor()?;
        let arguments = self.bind_arguments(constructor, &container)?;
        let mut instance = (constructor.invoke)(&arguments);
        self.inject(&mut instance, &container)?;
        Ok(Arc::from(instance))
    }

    fn select_constructor(&self) -> IocResult<&ErasedConstructor> {
        let constructors = &self.info.constructors;
        match constructors.as_slice() {
            [] => Err(IocError::invalid_argument(format!(
                "{} declares no constructor",
                self.info.type_name
            ))),
            [only] => Ok(only),
            _ => {
                let mut marked = constructors.iter().filter(|c| c.preferred);
                match (marked.next(), marked.count()) {
                    (Some(preferred), 0) => Ok(preferred),
                    (first, rest) => Err(IocError::AmbiguousConstructor {
                        type_name: self.info.type_name,
                        marked: usize::from(first.is_some()) + rest,
                    }),
                }
            }
        }
    }

    fn bind_arguments(&self, constructor: &ErasedConstructor, container: &Container) -> IocResult<Arguments> {
        let mut arguments = Arguments::with_capacity(constructor.parameters.len());
        for parameter in &constructor.parameters {
            let argument = match parameter.binding() {
                ParameterBinding::Dependency(key) => {
                    let service = container.get_service(key)?;
                    if service.is_none() {
                        tracing::warn!(
                            implementation = self.info.type_name,
                            parameter = parameter.name(),
                            %key,
                            "constructor dependency not found, binding none"
                        );
                    }
                    Argument::Service(service)
                }
                ParameterBinding::Scalar { kind, default } => match self.parameters.get(parameter.name()) {
                    Some(raw) => Argument::Scalar(parse_named(*kind, parameter.name(), raw)?),
                    None => match default {
                        Some(value) => Argument::Scalar(value.clone()),
                        None => {
                            return Err(IocError::MissingParameter {
                                parameter: parameter.name().to_string(),
                                type_name: self.info.type_name,
                            })
                        }
                    },
                },
            };
            arguments.push(parameter.name(), argument);
        }
        Ok(arguments)
    }

    fn inject(&self, instance: &mut AnyBox, container: &Container) -> IocResult<()> {
        if let Some(connect) = &self.info.connector {
            connect(&mut **instance, container.downgrade())?;
        }

        for dependency in &self.info.dependencies {
            let service = container.get_service(&dependency.key)?.ok_or_else(|| IocError::DependencyNotFound {
                key: dependency.key.to_string(),
                type_name: self.info.type_name,
            })?;
            (dependency.assign)(&mut **instance, service)?;
        }

        for (name, raw) in &self.properties {
            let property = self.info.property(name).ok_or_else(|| IocError::UnknownProperty {
                property: name.clone(),
                type_name: self.info.type_name,
            })?;
            let value = parse_named(property.kind, name, raw)?;
            (property.assign)(&mut **instance, value)?;
        }
        Ok(())
    }
}

impl ObjectBuilder for TransientBuilder {
    fn build(&self) -> IocResult<AnyArc> {
        self.build_instance()
    }

    fn lifetime(&self) -> Lifetime {
        Lifetime::Transient
    }

    fn type_name(&self) -> &'static str {
        TransientBuilder::type_name(self)
    }

    fn connect(&self, container: WeakContainer) -> IocResult<()> {
        TransientBuilder::connect(self, container)
    }
}
