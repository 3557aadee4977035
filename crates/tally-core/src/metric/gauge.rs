use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A point-in-time value produced by a gauge.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Int(i64),
    Unsigned(u64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Int(v) => write!(f, "{v}"),
            Reading::Unsigned(v) => write!(f, "{v}"),
            Reading::Float(v) => write!(f, "{v:.2}"),
            Reading::Bool(v) => write!(f, "{v}"),
            Reading::Text(v) => f.write_str(v),
        }
    }
}

macro_rules! reading_from {
    ($($ty:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(impl From<$ty> for Reading {
            fn from(v: $ty) -> Self {
                Reading::$variant(<$target>::from(v))
            }
        })*
    };
}

reading_from! {
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    u8 => Unsigned as u64,
    u16 => Unsigned as u64,
    u32 => Unsigned as u64,
    u64 => Unsigned as u64,
    f32 => Float as f64,
    f64 => Float as f64,
    bool => Bool as bool,
    String => Text as String,
    &'static str => Text as String,
}

impl From<usize> for Reading {
    fn from(v: usize) -> Self {
        Reading::Unsigned(v as u64)
    }
}

/// A metric whose value is computed by a caller function on every read.
pub struct Gauge<T> {
    read: Box<dyn Fn() -> T + Send + Sync>,
}

impl<T> Gauge<T> {
    pub fn new(read: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            read: Box::new(read),
        }
    }

    pub fn value(&self) -> T {
        (self.read)()
    }
}

impl<T> fmt::Debug for Gauge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gauge")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

/// Type-erased view of a [`Gauge`], as stored by the registry.
pub trait ReadGauge: Send + Sync {
    fn read(&self) -> Reading;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Into<Reading> + 'static> ReadGauge for Gauge<T> {
    fn read(&self) -> Reading {
        self.value().into()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
