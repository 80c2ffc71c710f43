//! Fila FIFO intrusiva de worker tasks.
//!
//! Lista simplesmente encadeada pelos `TaskLinks` das próprias tasks: não há
//! nó alocado, a fila só guarda `head` e `tail`. Vazia ⇔ `head == None`;
//! com exatamente uma task, `head` e `tail` apontam para ela.
//!
//! A fila não sabe nada de locks: o `WorkerTaskManager` a guarda num
//! `Spinlock`, e `&mut TaskQueue` é a prova de acesso exclusivo aos links.

use super::task::TaskRef;

pub struct TaskQueue {
    head: Option<TaskRef>,
    tail: Option<TaskRef>,
    len: usize,
}

impl TaskQueue {
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Anexa `task` no fim. Retorna `true` se a fila estava vazia.
    ///
    /// # Safety
    /// `task` precisa continuar válida até sair da fila por `pop`, e não
    /// pode estar em nenhuma outra fila.
    pub unsafe fn push(&mut self, task: TaskRef) -> bool {
        task.as_task().links().set_next(None);

        let was_empty = match self.tail {
            None => {
                self.head = Some(task);
                true
            }
            Some(tail) => {
                tail.as_task().links().set_next(Some(task));
                false
            }
        };

        self.tail = Some(task);
        self.len += 1;
        was_empty
    }

    /// Remove a task do início, já com o link zerado.
    pub fn pop(&mut self) -> Option<TaskRef> {
        let head = self.head?;

        // SAFETY: tudo que está na fila é válido pelo contrato de `push`, e
        // `&mut self` dá acesso exclusivo aos links.
        let next = unsafe {
            let links = head.as_task().links();
            let next = links.next();
            links.set_next(None);
            next
        };

        self.head = next;
        if next.is_none() {
            self.tail = None;
        }
        self.len -= 1;

        Some(head)
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}
