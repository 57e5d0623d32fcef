//! The C runtime backing every compiled Q program.
//!
//! Both files are embedded in the compiler binary and written next to
//! the emitted translation unit when no prebuilt `Builtins.o` is found,
//! so a checked program links without any manual setup.

/// Header describing the runtime ABI the emitted C code is written
/// against: object structs whose first field is the `clazz` descriptor
/// pointer, the descriptor singletons, and the boxing constructors.
pub const BUILTINS_H: &str = r#"/*
 * The Q runtime: the base class Obj and the built-in classes
 * Int, String, Boolean and Nothing.
 */

#ifndef Builtins_h
#define Builtins_h

struct obj_String_struct;
typedef struct obj_String_struct* obj_String;

struct obj_Boolean_struct;
typedef struct obj_Boolean_struct* obj_Boolean;

struct obj_Nothing_struct;
typedef struct obj_Nothing_struct* obj_Nothing;

/*
 * Obj
 */

struct class_Obj_struct;
typedef struct class_Obj_struct* class_Obj;

typedef struct obj_Obj_struct {
    class_Obj clazz;
} * obj_Obj;

struct class_Obj_struct {
    obj_Obj (*constructor) (void);
    obj_String (*STR) (obj_Obj);
    obj_Nothing (*PRINT) (obj_Obj);
    obj_Boolean (*EQUALS) (obj_Obj, obj_Obj);
};

extern class_Obj the_class_Obj;
extern obj_Obj new_Obj(void);

/*
 * String
 */

struct class_String_struct;
typedef struct class_String_struct* class_String;

struct obj_String_struct {
    class_String clazz;
    char *text;
};

struct class_String_struct {
    /* Inherited or overridden */
    obj_String (*constructor) (void);
    obj_String (*STR) (obj_String);
    obj_Nothing (*PRINT) (obj_String);
    obj_Boolean (*EQUALS) (obj_String, obj_Obj);
    /* Introduced in String */
    obj_String (*PLUS) (obj_String, obj_String);
    obj_Boolean (*ATMOST) (obj_String, obj_String);
    obj_Boolean (*LESS) (obj_String, obj_String);
    obj_Boolean (*ATLEAST) (obj_String, obj_String);
    obj_Boolean (*MORE) (obj_String, obj_String);
};

extern class_String the_class_String;
extern obj_String new_String(void);
extern obj_String str_literal(char *text);

/*
 * Boolean. The only two instances are lit_true and lit_false; value is
 * 0 for false and nonzero for true.
 */

struct class_Boolean_struct;
typedef struct class_Boolean_struct* class_Boolean;

struct obj_Boolean_struct {
    class_Boolean clazz;
    int value;
};

struct class_Boolean_struct {
    obj_Boolean (*constructor) (void);
    obj_String (*STR) (obj_Boolean);
    obj_Nothing (*PRINT) (obj_Obj);
    obj_Boolean (*EQUALS) (obj_Obj, obj_Obj);
    obj_Boolean (*NOT) (obj_Boolean, obj_Boolean);
    obj_Boolean (*AND) (obj_Boolean, obj_Boolean);
    obj_Boolean (*OR) (obj_Boolean, obj_Boolean);
};

extern class_Boolean the_class_Boolean;
extern obj_Boolean new_Boolean(void);
extern obj_Boolean lit_false;
extern obj_Boolean lit_true;

/*
 * Nothing (a singleton)
 */

struct class_Nothing_struct;
typedef struct class_Nothing_struct* class_Nothing;

struct obj_Nothing_struct {
    class_Nothing clazz;
};

struct class_Nothing_struct {
    obj_Nothing (*constructor) (void);
    obj_String (*STR) (obj_Nothing);
    obj_Nothing (*PRINT) (obj_Obj);
    obj_Boolean (*EQUALS) (obj_Obj, obj_Obj);
};

extern class_Nothing the_class_Nothing;
extern obj_Nothing new_Nothing(void);
extern obj_Nothing nothing;

/*
 * Int
 */

struct class_Int_struct;
typedef struct class_Int_struct* class_Int;

typedef struct obj_Int_struct {
    class_Int clazz;
    int value;
} * obj_Int;

struct class_Int_struct {
    /* Inherited or overridden */
    obj_Int (*constructor) (void);
    obj_String (*STR) (obj_Int);
    obj_Nothing (*PRINT) (obj_Obj);
    obj_Boolean (*EQUALS) (obj_Int, obj_Obj);
    /* Introduced in Int */
    obj_Int (*PLUS) (obj_Int, obj_Int);
    obj_Int (*MINUS) (obj_Int, obj_Int);
    obj_Int (*TIMES) (obj_Int, obj_Int);
    obj_Int (*DIVIDE) (obj_Int, obj_Int);
    obj_Boolean (*ATMOST) (obj_Int, obj_Int);
    obj_Boolean (*LESS) (obj_Int, obj_Int);
    obj_Boolean (*ATLEAST) (obj_Int, obj_Int);
    obj_Boolean (*MORE) (obj_Int, obj_Int);
};

extern class_Int the_class_Int;
extern obj_Int new_Int(void);
extern obj_Int int_literal(int n);

/*
 * The per-class methods, visible so user vtables can inherit them.
 */
obj_String Obj_method_STR(obj_Obj this);
obj_Nothing Obj_method_PRINT(obj_Obj this);
obj_Boolean Obj_method_EQUALS(obj_Obj this, obj_Obj other);

obj_String String_method_STR(obj_String this);
obj_Nothing String_method_PRINT(obj_String this);
obj_Boolean String_method_EQUALS(obj_String this, obj_Obj other);
obj_String String_method_PLUS(obj_String this, obj_String other);
obj_Boolean String_method_ATMOST(obj_String this, obj_String other);
obj_Boolean String_method_LESS(obj_String this, obj_String other);
obj_Boolean String_method_ATLEAST(obj_String this, obj_String other);
obj_Boolean String_method_MORE(obj_String this, obj_String other);

obj_String Boolean_method_STR(obj_Boolean this);
obj_Boolean Boolean_method_NOT(obj_Boolean this, obj_Boolean unused);
obj_Boolean Boolean_method_AND(obj_Boolean this, obj_Boolean other);
obj_Boolean Boolean_method_OR(obj_Boolean this, obj_Boolean other);

obj_String Nothing_method_STR(obj_Nothing this);

obj_String Int_method_STR(obj_Int this);
obj_Boolean Int_method_EQUALS(obj_Int this, obj_Obj other);
obj_Int Int_method_PLUS(obj_Int this, obj_Int other);
obj_Int Int_method_MINUS(obj_Int this, obj_Int other);
obj_Int Int_method_TIMES(obj_Int this, obj_Int other);
obj_Int Int_method_DIVIDE(obj_Int this, obj_Int other);
obj_Boolean Int_method_ATMOST(obj_Int this, obj_Int other);
obj_Boolean Int_method_LESS(obj_Int this, obj_Int other);
obj_Boolean Int_method_ATLEAST(obj_Int this, obj_Int other);
obj_Boolean Int_method_MORE(obj_Int this, obj_Int other);

#endif
"#;

/// Implementation of the runtime ABI. Allocations are never reclaimed;
/// the compiled programs are compile-then-exit tools.
pub const BUILTINS_C: &str = r#"#include <stdio.h>
#include <stdlib.h>
#include <string.h>

#include "Builtins.h"

static obj_String wrap_string(char *text)
{
    obj_String s = malloc(sizeof(struct obj_String_struct));
    s->clazz = the_class_String;
    s->text = text;
    return s;
}

/*
 * Obj
 */

obj_Obj new_Obj(void)
{
    obj_Obj o = malloc(sizeof(struct obj_Obj_struct));
    o->clazz = the_class_Obj;
    return o;
}

obj_String Obj_method_STR(obj_Obj this)
{
    return wrap_string("<Object>");
}

obj_Nothing Obj_method_PRINT(obj_Obj this)
{
    obj_String s = this->clazz->STR(this);
    fputs(s->text, stdout);
    return nothing;
}

obj_Boolean Obj_method_EQUALS(obj_Obj this, obj_Obj other)
{
    return (this == other) ? lit_true : lit_false;
}

/*
 * String
 */

obj_String new_String(void)
{
    return wrap_string("");
}

obj_String str_literal(char *text)
{
    return wrap_string(strdup(text));
}

obj_String String_method_STR(obj_String this)
{
    return this;
}

obj_Nothing String_method_PRINT(obj_String this)
{
    fputs(this->text, stdout);
    return nothing;
}

obj_Boolean String_method_EQUALS(obj_String this, obj_Obj other)
{
    if ((class_String) other->clazz != the_class_String)
        return lit_false;
    obj_String o = (obj_String) other;
    return (strcmp(this->text, o->text) == 0) ? lit_true : lit_false;
}

obj_String String_method_PLUS(obj_String this, obj_String other)
{
    char *joined = malloc(strlen(this->text) + strlen(other->text) + 1);
    strcpy(joined, this->text);
    strcat(joined, other->text);
    return wrap_string(joined);
}

obj_Boolean String_method_ATMOST(obj_String this, obj_String other)
{
    return (strcmp(this->text, other->text) <= 0) ? lit_true : lit_false;
}

obj_Boolean String_method_LESS(obj_String this, obj_String other)
{
    return (strcmp(this->text, other->text) < 0) ? lit_true : lit_false;
}

obj_Boolean String_method_ATLEAST(obj_String this, obj_String other)
{
    return (strcmp(this->text, other->text) >= 0) ? lit_true : lit_false;
}

obj_Boolean String_method_MORE(obj_String this, obj_String other)
{
    return (strcmp(this->text, other->text) > 0) ? lit_true : lit_false;
}

/*
 * Boolean
 */

obj_Boolean new_Boolean(void)
{
    return lit_false;
}

obj_String Boolean_method_STR(obj_Boolean this)
{
    return wrap_string(this->value ? "true" : "false");
}

obj_Boolean Boolean_method_NOT(obj_Boolean this, obj_Boolean unused)
{
    return this->value ? lit_false : lit_true;
}

obj_Boolean Boolean_method_AND(obj_Boolean this, obj_Boolean other)
{
    return (this->value && other->value) ? lit_true : lit_false;
}

obj_Boolean Boolean_method_OR(obj_Boolean this, obj_Boolean other)
{
    return (this->value || other->value) ? lit_true : lit_false;
}

/*
 * Nothing
 */

obj_Nothing new_Nothing(void)
{
    return nothing;
}

obj_String Nothing_method_STR(obj_Nothing this)
{
    return wrap_string("nothing");
}

/*
 * Int
 */

obj_Int new_Int(void)
{
    return int_literal(0);
}

obj_Int int_literal(int n)
{
    obj_Int i = malloc(sizeof(struct obj_Int_struct));
    i->clazz = the_class_Int;
    i->value = n;
    return i;
}

obj_String Int_method_STR(obj_Int this)
{
    char *text = malloc(16);
    snprintf(text, 16, "%d", this->value);
    return wrap_string(text);
}

obj_Boolean Int_method_EQUALS(obj_Int this, obj_Obj other)
{
    if ((class_Int) other->clazz != the_class_Int)
        return lit_false;
    obj_Int o = (obj_Int) other;
    return (this->value == o->value) ? lit_true : lit_false;
}

obj_Int Int_method_PLUS(obj_Int this, obj_Int other)
{
    return int_literal(this->value + other->value);
}

obj_Int Int_method_MINUS(obj_Int this, obj_Int other)
{
    return int_literal(this->value - other->value);
}

obj_Int Int_method_TIMES(obj_Int this, obj_Int other)
{
    return int_literal(this->value * other->value);
}

obj_Int Int_method_DIVIDE(obj_Int this, obj_Int other)
{
    return int_literal(this->value / other->value);
}

obj_Boolean Int_method_ATMOST(obj_Int this, obj_Int other)
{
    return (this->value <= other->value) ? lit_true : lit_false;
}

obj_Boolean Int_method_LESS(obj_Int this, obj_Int other)
{
    return (this->value < other->value) ? lit_true : lit_false;
}

obj_Boolean Int_method_ATLEAST(obj_Int this, obj_Int other)
{
    return (this->value >= other->value) ? lit_true : lit_false;
}

obj_Boolean Int_method_MORE(obj_Int this, obj_Int other)
{
    return (this->value > other->value) ? lit_true : lit_false;
}

/*
 * Class descriptors and singletons
 */

struct class_Obj_struct the_class_Obj_struct = {
    .constructor = new_Obj,
    .STR = Obj_method_STR,
    .PRINT = Obj_method_PRINT,
    .EQUALS = Obj_method_EQUALS,
};
class_Obj the_class_Obj = &the_class_Obj_struct;

struct class_String_struct the_class_String_struct = {
    .constructor = new_String,
    .STR = String_method_STR,
    .PRINT = String_method_PRINT,
    .EQUALS = String_method_EQUALS,
    .PLUS = String_method_PLUS,
    .ATMOST = String_method_ATMOST,
    .LESS = String_method_LESS,
    .ATLEAST = String_method_ATLEAST,
    .MORE = String_method_MORE,
};
class_String the_class_String = &the_class_String_struct;

struct class_Boolean_struct the_class_Boolean_struct = {
    .constructor = new_Boolean,
    .STR = Boolean_method_STR,
    .PRINT = Obj_method_PRINT,
    .EQUALS = Obj_method_EQUALS,
    .NOT = Boolean_method_NOT,
    .AND = Boolean_method_AND,
    .OR = Boolean_method_OR,
};
class_Boolean the_class_Boolean = &the_class_Boolean_struct;

struct class_Nothing_struct the_class_Nothing_struct = {
    .constructor = new_Nothing,
    .STR = Nothing_method_STR,
    .PRINT = Obj_method_PRINT,
    .EQUALS = Obj_method_EQUALS,
};
class_Nothing the_class_Nothing = &the_class_Nothing_struct;

struct class_Int_struct the_class_Int_struct = {
    .constructor = new_Int,
    .STR = Int_method_STR,
    .PRINT = Obj_method_PRINT,
    .EQUALS = Int_method_EQUALS,
    .PLUS = Int_method_PLUS,
    .MINUS = Int_method_MINUS,
    .TIMES = Int_method_TIMES,
    .DIVIDE = Int_method_DIVIDE,
    .ATMOST = Int_method_ATMOST,
    .LESS = Int_method_LESS,
    .ATLEAST = Int_method_ATLEAST,
    .MORE = Int_method_MORE,
};
class_Int the_class_Int = &the_class_Int_struct;

static struct obj_Boolean_struct lit_false_struct = { &the_class_Boolean_struct, 0 };
obj_Boolean lit_false = &lit_false_struct;
static struct obj_Boolean_struct lit_true_struct = { &the_class_Boolean_struct, 1 };
obj_Boolean lit_true = &lit_true_struct;

static struct obj_Nothing_struct nothing_struct = { &the_class_Nothing_struct };
obj_Nothing nothing = &nothing_struct;
"#;
